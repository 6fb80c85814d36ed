//! Expose diffing of string lists to WebAssembly.
use wasm_bindgen::prelude::*;

use crate::{ChangeStep, ordering::for_batch_update};

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc<'_> = wee_alloc::WeeAlloc::INIT;

/// Changes turning `old` into `new`, ordered so that they can be applied one
/// by one to a copy of `old`.
#[wasm_bindgen(js_name = diffStrings)]
#[must_use]
pub fn diff_strings(old: Vec<String>, new: Vec<String>) -> Vec<JsChangeStep> {
    set_panic_hook();

    crate::changes_by_value(&old, &new)
        .into_iter()
        .map(JsChangeStep::from)
        .collect()
}

/// Changes turning `old` into `new`, ordered for a grouped list view update:
/// updates, then deletions against `old`, then insertions against `new`.
#[wasm_bindgen(js_name = diffStringsForBatchUpdate)]
#[must_use]
pub fn diff_strings_for_batch_update(old: Vec<String>, new: Vec<String>) -> Vec<JsChangeStep> {
    set_panic_hook();

    for_batch_update(crate::unordered_changes_by_value(&old, &new))
        .into_iter()
        .map(JsChangeStep::from)
        .collect()
}

fn set_panic_hook() {
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Delete,
    Move,
    Update,
}

/// Wrapper type to expose a flat `ChangeStep` over strings to JS.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsChangeStep {
    kind: ChangeKind,
    item: String,
    index: usize,
    target: Option<usize>,
}

#[wasm_bindgen]
impl JsChangeStep {
    #[must_use]
    pub fn kind(&self) -> ChangeKind { self.kind }

    #[must_use]
    pub fn item(&self) -> String { self.item.clone() }

    /// Position the step refers to; the origin for moves.
    #[must_use]
    pub fn index(&self) -> usize { self.index }

    /// Destination of a move, `undefined` for every other kind.
    #[must_use]
    pub fn target(&self) -> Option<usize> { self.target }
}

impl From<ChangeStep<String, usize>> for JsChangeStep {
    fn from(step: ChangeStep<String, usize>) -> Self {
        let (kind, target) = match step {
            ChangeStep::Insert { .. } => (ChangeKind::Insert, None),
            ChangeStep::Delete { .. } => (ChangeKind::Delete, None),
            ChangeStep::Move { to, .. } => (ChangeKind::Move, Some(to)),
            ChangeStep::Update { .. } => (ChangeKind::Update, None),
        };
        let index = *step.index();

        JsChangeStep {
            kind,
            item: step.into_item(),
            index,
            target,
        }
    }
}
