use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single step of the change list needed to turn one ordered collection
/// into another.
///
/// `Index` is `usize` for flat sequences and
/// [`TableIndex`](crate::TableIndex) for rows of a sectioned table.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStep<Item, Index> {
    Insert { item: Item, at: Index },
    Delete { item: Item, at: Index },
    Move { item: Item, from: Index, to: Index },
    Update { item: Item, at: Index },
}

impl<Item, Index> ChangeStep<Item, Index> {
    /// The item carried by the step. For moves and updates this is the
    /// element as it appears in the new collection.
    pub fn item(&self) -> &Item {
        match self {
            ChangeStep::Insert { item, .. }
            | ChangeStep::Delete { item, .. }
            | ChangeStep::Move { item, .. }
            | ChangeStep::Update { item, .. } => item,
        }
    }

    pub fn into_item(self) -> Item {
        match self {
            ChangeStep::Insert { item, .. }
            | ChangeStep::Delete { item, .. }
            | ChangeStep::Move { item, .. }
            | ChangeStep::Update { item, .. } => item,
        }
    }

    /// The position the step refers to. Moves report their origin.
    pub fn index(&self) -> &Index {
        match self {
            ChangeStep::Insert { at, .. }
            | ChangeStep::Delete { at, .. }
            | ChangeStep::Update { at, .. }
            | ChangeStep::Move { from: at, .. } => at,
        }
    }

    pub fn is_insert(&self) -> bool { matches!(self, ChangeStep::Insert { .. }) }

    pub fn is_delete(&self) -> bool { matches!(self, ChangeStep::Delete { .. }) }

    pub fn is_move(&self) -> bool { matches!(self, ChangeStep::Move { .. }) }

    pub fn is_update(&self) -> bool { matches!(self, ChangeStep::Update { .. }) }

    /// Transforms the carried item while keeping the kind of step and its
    /// positions.
    pub fn map<T>(self, transform: impl FnOnce(Item) -> T) -> ChangeStep<T, Index> {
        match self {
            ChangeStep::Insert { item, at } => ChangeStep::Insert {
                item: transform(item),
                at,
            },
            ChangeStep::Delete { item, at } => ChangeStep::Delete {
                item: transform(item),
                at,
            },
            ChangeStep::Move { item, from, to } => ChangeStep::Move {
                item: transform(item),
                from,
                to,
            },
            ChangeStep::Update { item, at } => ChangeStep::Update {
                item: transform(item),
                at,
            },
        }
    }

    /// Transforms every position of the step. A move's origin and
    /// destination are both passed through `transform`.
    pub fn map_index<T>(self, mut transform: impl FnMut(Index) -> T) -> ChangeStep<Item, T> {
        match self {
            ChangeStep::Insert { item, at } => ChangeStep::Insert {
                item,
                at: transform(at),
            },
            ChangeStep::Delete { item, at } => ChangeStep::Delete {
                item,
                at: transform(at),
            },
            ChangeStep::Move { item, from, to } => ChangeStep::Move {
                item,
                from: transform(from),
                to: transform(to),
            },
            ChangeStep::Update { item, at } => ChangeStep::Update {
                item,
                at: transform(at),
            },
        }
    }
}

impl<Item, Index> Display for ChangeStep<Item, Index>
where
    Item: Display,
    Index: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStep::Insert { item, at } => write!(f, "Inserting '{item}' at '{at}'"),
            ChangeStep::Delete { item, at } => write!(f, "Deleting '{item}' at '{at}'"),
            ChangeStep::Move { item, from, to } => {
                write!(f, "Moving '{item}' from index '{from}' to '{to}'")
            }
            ChangeStep::Update { item, at } => write!(f, "Updating '{item}' at '{at}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_map() {
        let change: ChangeStep<f64, usize> = ChangeStep::Insert { item: 1.5, at: 0 };

        let mapped: ChangeStep<String, usize> = change.map(|item| item.to_string());
        assert_eq!(
            mapped,
            ChangeStep::Insert {
                item: "1.5".to_owned(),
                at: 0
            }
        );
    }

    #[test]
    fn test_map_index() {
        let change = ChangeStep::Move {
            item: 'x',
            from: 3_usize,
            to: 1,
        };

        let mapped = change.map_index(|index| index.to_string());
        assert_eq!(
            mapped,
            ChangeStep::Move {
                item: 'x',
                from: "3".to_owned(),
                to: "1".to_owned()
            }
        );
    }

    #[test]
    fn test_index_of_move_is_origin() {
        let change = ChangeStep::Move {
            item: "a",
            from: 4_usize,
            to: 0,
        };

        assert_eq!(*change.index(), 4);
        assert_eq!(*change.item(), "a");
        assert!(change.is_move());
        assert!(!change.is_insert());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ChangeStep::Insert { item: "b", at: 1 }.to_string(),
            "Inserting 'b' at '1'"
        );
        assert_eq!(
            ChangeStep::Delete { item: "b", at: 1 }.to_string(),
            "Deleting 'b' at '1'"
        );
        assert_eq!(
            ChangeStep::Move {
                item: "c",
                from: 2,
                to: 0
            }
            .to_string(),
            "Moving 'c' from index '2' to '0'"
        );
        assert_eq!(
            ChangeStep::Update { item: "a", at: 0 }.to_string(),
            "Updating 'a' at '0'"
        );
    }
}
