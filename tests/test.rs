mod table_transition;

use std::{fs, path::Path};

use serde::Deserialize;
use table_transition::TableTransition;

#[test]
fn test_table_transitions_one_way() {
    for transition in &get_all_transitions() {
        transition.assert_builds(&transition.from(), &transition.to());
    }
}

#[test]
fn test_table_transitions_inverse_way() {
    for transition in &get_all_transitions() {
        transition.assert_builds(&transition.to(), &transition.from());
    }
}

#[test]
fn test_flattened_rows_one_way() {
    for transition in &get_all_transitions() {
        transition.assert_rows_build(&transition.from(), &transition.to());
    }
}

#[test]
fn test_flattened_rows_inverse_way() {
    for transition in &get_all_transitions() {
        transition.assert_rows_build(&transition.to(), &transition.from());
    }
}

fn get_all_transitions() -> Vec<TableTransition> {
    let cases_dir = Path::new("tests/cases");
    let entries = fs::read_dir(cases_dir)
        .expect("Failed to read cases directory")
        .collect::<Vec<_>>();

    let mut transitions = Vec::new();

    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("yml") {
            let file = fs::File::open(&path).expect("Failed to open case file");
            for document in serde_yaml::Deserializer::from_reader(file) {
                let transition = TableTransition::deserialize(document)
                    .expect("Failed to deserialize table transition");
                transitions.push(transition);
            }
        }
    }

    assert!(!transitions.is_empty(), "No table transitions found");
    transitions
}
