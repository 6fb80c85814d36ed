#![cfg(feature = "wasm")]

use sectioned_diff::wasm::*;
use wasm_bindgen_test::*;

fn strings(items: &[&str]) -> Vec<String> { items.iter().map(|item| (*item).to_owned()).collect() }

#[wasm_bindgen_test(unsupported = test)]
fn test_diff_strings() {
    let steps = diff_strings(strings(&["a", "b"]), strings(&["a", "b", "c"]));

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].kind(), ChangeKind::Insert);
    assert_eq!(steps[0].item(), "c");
    assert_eq!(steps[0].index(), 2);
    assert_eq!(steps[0].target(), None);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_diff_identical_strings() {
    assert!(diff_strings(strings(&["x", "y"]), strings(&["x", "y"])).is_empty());
}

#[wasm_bindgen_test(unsupported = test)]
fn test_diff_strings_for_batch_update_splits_moves() {
    let steps = diff_strings_for_batch_update(strings(&["a", "b", "c"]), strings(&["c", "b", "a"]));

    let kinds: Vec<ChangeKind> = steps.iter().map(JsChangeStep::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::Delete,
            ChangeKind::Delete,
            ChangeKind::Insert,
            ChangeKind::Insert
        ]
    );
    assert_eq!(steps[0].index(), 2);
    assert_eq!(steps[1].index(), 0);
    assert_eq!(steps[2].index(), 0);
    assert_eq!(steps[3].index(), 2);
}
