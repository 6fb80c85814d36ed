use std::fmt::Display;

use pretty_assertions::assert_eq;
use sectioned_diff::{ChangeStep, OrderedCollection, Table, changes_by_value};
use serde::Deserialize;

type Sections = Vec<(String, Vec<i32>)>;

/// A pair of sectioned tables described in YAML:
///
/// ```yaml
/// name: append a section
/// from: [[A, [1]]]
/// to: [[A, [1]], [B, [1]]]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TableTransition {
    name: String,
    from: Sections,
    to: Sections,
}

impl TableTransition {
    pub fn from(&self) -> Table<String, i32> { Table::from_sections(self.from.clone()) }

    pub fn to(&self) -> Table<String, i32> { Table::from_sections(self.to.clone()) }

    /// Asserts that the composed changes from `old` to `new` rebuild `new`.
    pub fn assert_builds(&self, old: &Table<String, i32>, new: &Table<String, i32>) {
        let mut built = old.clone();
        let changes = old.changes_to_build_by_value(new);

        if let Err(error) = built.apply(changes.clone()) {
            panic!(
                "{}: {error}\nchanges:\n{}",
                self.name,
                lines(&changes)
            );
        }

        assert_eq!(&built, new, "{}", self.name);
    }

    /// Asserts the same for the flattened rows of both tables.
    pub fn assert_rows_build(&self, old: &Table<String, i32>, new: &Table<String, i32>) {
        let old_rows: Vec<i32> = old.iter().copied().collect();
        let new_rows: Vec<i32> = new.iter().copied().collect();

        let steps: Vec<ChangeStep<i32, usize>> = changes_by_value(&old_rows, &new_rows);

        let mut built = old_rows.clone();
        built
            .apply_changes(steps)
            .unwrap_or_else(|error| panic!("{}: {error}", self.name));

        assert_eq!(built, new_rows, "{}", self.name);
    }
}

fn lines(items: &[impl Display]) -> String {
    items
        .iter()
        .map(|item| format!("  {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
