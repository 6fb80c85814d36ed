//! Policies for ordering a change list before it is consumed.
//!
//! The raw output of the diff is not safe to apply in emission order. Two
//! consumers need two different orders:
//!
//! - [`for_sequential_apply`] orders steps so that each one can be applied
//!   on its own to an in-memory collection, one after the other.
//! - [`for_batch_update`] and [`table_changes_for_batch_update`] order steps
//!   the way grouped list-view updates interpret them: updates and deletions
//!   against the state before the batch, insertions against the state after
//!   all deletions.
//!
//! Both policies split every move into a deletion at its origin and an
//! insertion at its destination.

use std::cmp::{Ordering, Reverse};

use crate::{ChangeStep, TableChange};

struct Partitioned<Item, Index> {
    deletions: Vec<ChangeStep<Item, Index>>,
    updates: Vec<ChangeStep<Item, Index>>,
    insertions: Vec<ChangeStep<Item, Index>>,
}

fn partition<Item, Index>(
    changes: impl IntoIterator<Item = ChangeStep<Item, Index>>,
) -> Partitioned<Item, Index>
where
    Item: Clone,
{
    let mut partitioned = Partitioned {
        deletions: Vec::new(),
        updates: Vec::new(),
        insertions: Vec::new(),
    };

    for change in changes {
        match change {
            ChangeStep::Insert { .. } => partitioned.insertions.push(change),
            ChangeStep::Delete { .. } => partitioned.deletions.push(change),
            ChangeStep::Update { .. } => partitioned.updates.push(change),
            ChangeStep::Move { item, from, to } => {
                partitioned.deletions.push(ChangeStep::Delete {
                    item: item.clone(),
                    at: from,
                });
                partitioned
                    .insertions
                    .push(ChangeStep::Insert { item, at: to });
            }
        }
    }

    partitioned
}

/// Orders flat changes so that applying them one by one to the old
/// collection builds the new one.
///
/// Deletions come first from the highest index down, at most one per index.
/// Updates follow with their positions shifted to account for the removals
/// before them. Insertions come last from the lowest index up.
pub fn for_sequential_apply<T>(
    changes: impl IntoIterator<Item = ChangeStep<T, usize>>,
) -> Vec<ChangeStep<T, usize>>
where
    T: Clone,
{
    let Partitioned {
        mut deletions,
        updates,
        mut insertions,
    } = partition(changes);

    deletions.sort_by_key(|change| Reverse(*change.index()));
    deletions.dedup_by_key(|change| *change.index());

    let mut deleted_indexes: Vec<usize> = deletions.iter().map(|change| *change.index()).collect();
    deleted_indexes.reverse();

    let updates = updates.into_iter().map(|change| {
        change.map_index(|at| at - deleted_indexes.partition_point(|&deleted| deleted < at))
    });

    insertions.sort_by_key(|change| *change.index());

    deletions
        .into_iter()
        .chain(updates)
        .chain(insertions)
        .collect()
}

/// Orders changes for a grouped (batch) update: updates, then deletions
/// from the highest index down, then insertions from the lowest index up.
///
/// Updates and deletions keep referring to positions before the batch;
/// insertions refer to positions after every deletion has happened.
pub fn for_batch_update<T, I>(
    changes: impl IntoIterator<Item = ChangeStep<T, I>>,
) -> Vec<ChangeStep<T, I>>
where
    T: Clone,
    I: Ord,
{
    let Partitioned {
        mut deletions,
        updates,
        mut insertions,
    } = partition(changes);

    deletions.sort_by(|a, b| b.index().cmp(a.index()));
    insertions.sort_by(|a, b| a.index().cmp(b.index()));

    updates
        .into_iter()
        .chain(deletions)
        .chain(insertions)
        .collect()
}

/// [`for_batch_update`] for sectioned tables.
///
/// Row deletions precede section deletions, section insertions precede row
/// insertions. Within each group the usual descending or ascending index
/// order applies.
pub fn table_changes_for_batch_update<S, R>(
    changes: impl IntoIterator<Item = TableChange<S, R>>,
) -> Vec<TableChange<S, R>>
where
    S: Clone,
    R: Clone,
{
    let mut deletions = Vec::new();
    let mut updates = Vec::new();
    let mut insertions = Vec::new();

    for change in changes {
        match change {
            TableChange::Section(step) => {
                let Partitioned {
                    deletions: section_deletions,
                    updates: section_updates,
                    insertions: section_insertions,
                } = partition([step]);
                deletions.extend(section_deletions.into_iter().map(TableChange::Section));
                updates.extend(section_updates.into_iter().map(TableChange::Section));
                insertions.extend(section_insertions.into_iter().map(TableChange::Section));
            }
            TableChange::Row(step) => {
                let Partitioned {
                    deletions: row_deletions,
                    updates: row_updates,
                    insertions: row_insertions,
                } = partition([step]);
                deletions.extend(row_deletions.into_iter().map(TableChange::Row));
                updates.extend(row_updates.into_iter().map(TableChange::Row));
                insertions.extend(row_insertions.into_iter().map(TableChange::Row));
            }
        }
    }

    deletions.sort_by(|a, b| match (a, b) {
        (TableChange::Section(a), TableChange::Section(b)) => b.index().cmp(a.index()),
        (TableChange::Row(a), TableChange::Row(b)) => b.index().cmp(a.index()),
        (TableChange::Row(_), TableChange::Section(_)) => Ordering::Less,
        (TableChange::Section(_), TableChange::Row(_)) => Ordering::Greater,
    });

    insertions.sort_by(|a, b| match (a, b) {
        (TableChange::Section(a), TableChange::Section(b)) => a.index().cmp(b.index()),
        (TableChange::Row(a), TableChange::Row(b)) => a.index().cmp(b.index()),
        (TableChange::Section(_), TableChange::Row(_)) => Ordering::Less,
        (TableChange::Row(_), TableChange::Section(_)) => Ordering::Greater,
    });

    updates
        .into_iter()
        .chain(deletions)
        .chain(insertions)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::{TableIndex, unordered_changes_by_value};

    #[test]
    fn test_sequential_splits_moves() {
        let ordered = for_sequential_apply(unordered_changes_by_value(
            &["a", "b", "c"],
            &["c", "b", "a"],
        ));

        assert_eq!(
            ordered,
            vec![
                ChangeStep::Delete { item: "c", at: 2 },
                ChangeStep::Delete { item: "a", at: 0 },
                ChangeStep::Insert { item: "c", at: 0 },
                ChangeStep::Insert { item: "a", at: 2 },
            ]
        );
    }

    #[test]
    fn test_sequential_shifts_updates_past_deletions() {
        let ordered = for_sequential_apply(vec![
            ChangeStep::Delete { item: 'a', at: 0 },
            ChangeStep::Update { item: 'C', at: 2 },
            ChangeStep::Delete { item: 'b', at: 1 },
            ChangeStep::Update { item: 'D', at: 3 },
            ChangeStep::Delete { item: 'e', at: 4 },
        ]);

        assert_eq!(
            ordered,
            vec![
                ChangeStep::Delete { item: 'e', at: 4 },
                ChangeStep::Delete { item: 'b', at: 1 },
                ChangeStep::Delete { item: 'a', at: 0 },
                ChangeStep::Update { item: 'C', at: 0 },
                ChangeStep::Update { item: 'D', at: 1 },
            ]
        );
    }

    #[test]
    fn test_batch_puts_updates_first() {
        let ordered = for_batch_update(vec![
            ChangeStep::Insert { item: 'x', at: 3 },
            ChangeStep::Delete { item: 'a', at: 0 },
            ChangeStep::Move {
                item: 'b',
                from: 1,
                to: 0,
            },
            ChangeStep::Update { item: 'c', at: 2 },
        ]);

        assert_eq!(
            ordered,
            vec![
                ChangeStep::Update { item: 'c', at: 2 },
                ChangeStep::Delete { item: 'b', at: 1 },
                ChangeStep::Delete { item: 'a', at: 0 },
                ChangeStep::Insert { item: 'b', at: 0 },
                ChangeStep::Insert { item: 'x', at: 3 },
            ]
        );
    }

    #[test]
    fn test_table_batch_orders_rows_and_sections() {
        let row = |section, row| TableIndex::new(section, row);

        let ordered = table_changes_for_batch_update::<&str, u8>(vec![
            TableChange::Section(ChangeStep::Insert { item: "B", at: 1 }),
            TableChange::Row(ChangeStep::Insert {
                item: 2,
                at: row(0, 1),
            }),
            TableChange::Section(ChangeStep::Delete { item: "C", at: 0 }),
            TableChange::Row(ChangeStep::Delete {
                item: 9,
                at: row(1, 0),
            }),
            TableChange::Row(ChangeStep::Delete {
                item: 8,
                at: row(1, 3),
            }),
            TableChange::Section(ChangeStep::Update { item: "A", at: 1 }),
        ]);

        assert_eq!(
            ordered,
            vec![
                TableChange::Section(ChangeStep::Update { item: "A", at: 1 }),
                TableChange::Row(ChangeStep::Delete {
                    item: 8,
                    at: row(1, 3)
                }),
                TableChange::Row(ChangeStep::Delete {
                    item: 9,
                    at: row(1, 0)
                }),
                TableChange::Section(ChangeStep::Delete { item: "C", at: 0 }),
                TableChange::Section(ChangeStep::Insert { item: "B", at: 1 }),
                TableChange::Row(ChangeStep::Insert {
                    item: 2,
                    at: row(0, 1)
                }),
            ]
        );
    }

    proptest! {
        #[test]
        fn batch_deletions_descend_and_insertions_ascend(
            old in prop::collection::vec(0_u8..8, 0..40),
            new in prop::collection::vec(0_u8..8, 0..40),
        ) {
            let ordered = for_batch_update(unordered_changes_by_value(&old, &new));

            let deleted: Vec<usize> = ordered
                .iter()
                .filter(|change| change.is_delete())
                .map(|change| *change.index())
                .collect();
            let inserted: Vec<usize> = ordered
                .iter()
                .filter(|change| change.is_insert())
                .map(|change| *change.index())
                .collect();

            prop_assert!(deleted.windows(2).all(|pair| pair[0] > pair[1]));
            prop_assert!(inserted.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert!(!ordered.iter().any(ChangeStep::is_move));

            let first_insertion = ordered
                .iter()
                .position(ChangeStep::is_insert)
                .unwrap_or(ordered.len());
            prop_assert!(ordered[first_insertion..].iter().all(ChangeStep::is_insert));
        }
    }
}
