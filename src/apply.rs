use std::collections::VecDeque;

use crate::{ApplyError, ChangeStep};

/// An ordered, index addressable collection that flat change lists can be
/// applied to.
///
/// Only the four structural primitives need to be provided. Moves are
/// expressed through them as a removal followed by an insertion.
pub trait OrderedCollection {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Inserts `item` at `index`, shifting later elements back.
    /// `index` is at most [`len`](Self::len).
    fn insert_at(&mut self, index: usize, item: Self::Item);

    /// Removes and returns the element at `index`, shifting later elements
    /// forward. `index` is less than [`len`](Self::len).
    fn remove_at(&mut self, index: usize) -> Self::Item;

    /// Replaces the element at `index`. `index` is less than
    /// [`len`](Self::len).
    fn replace_at(&mut self, index: usize, item: Self::Item);

    /// Moves the element at `from` so that it ends up at `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    fn move_element(&mut self, from: usize, to: usize) {
        assert!(
            from < self.len() && to < self.len(),
            "Cannot move from {from} to {to} in a collection of {} elements",
            self.len()
        );

        let item = self.remove_at(from);
        self.insert_at(to, item);
    }

    /// Applies `changes` one at a time in the given order.
    ///
    /// The changes must be ordered for sequential application, such as the
    /// ones returned by [`changes`](crate::changes). Changes ordered for a
    /// batch update refer to intermediate states that don't exist when
    /// applying them one by one.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::IndexOutOfBounds`] when a step refers to a
    /// position outside of the collection. The steps before it stay applied.
    fn apply_changes(
        &mut self,
        changes: impl IntoIterator<Item = ChangeStep<Self::Item, usize>>,
    ) -> Result<(), ApplyError> {
        for (step, change) in changes.into_iter().enumerate() {
            let len = self.len();
            let out_of_bounds = |index| ApplyError::IndexOutOfBounds { step, index, len };

            match change {
                ChangeStep::Insert { item, at } => {
                    if at > len {
                        return Err(out_of_bounds(at));
                    }
                    self.insert_at(at, item);
                }
                ChangeStep::Delete { at, .. } => {
                    if at >= len {
                        return Err(out_of_bounds(at));
                    }
                    self.remove_at(at);
                }
                ChangeStep::Update { item, at } => {
                    if at >= len {
                        return Err(out_of_bounds(at));
                    }
                    self.replace_at(at, item);
                }
                ChangeStep::Move { item, from, to } => {
                    if from >= len || to >= len {
                        return Err(out_of_bounds(from.max(to)));
                    }
                    self.remove_at(from);
                    self.insert_at(to, item);
                }
            }
        }

        Ok(())
    }
}

impl<T> OrderedCollection for Vec<T> {
    type Item = T;

    fn len(&self) -> usize { Vec::len(self) }

    fn insert_at(&mut self, index: usize, item: T) { self.insert(index, item); }

    fn remove_at(&mut self, index: usize) -> T { self.remove(index) }

    fn replace_at(&mut self, index: usize, item: T) { self[index] = item; }
}

impl<T> OrderedCollection for VecDeque<T> {
    type Item = T;

    fn len(&self) -> usize { VecDeque::len(self) }

    fn insert_at(&mut self, index: usize, item: T) { self.insert(index, item); }

    fn remove_at(&mut self, index: usize) -> T {
        match self.remove(index) {
            Some(item) => item,
            None => panic!("Index {index} is out of bounds for a deque of {} elements", self.len()),
        }
    }

    fn replace_at(&mut self, index: usize, item: T) { self[index] = item; }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::{changes, changes_by_value};

    #[test]
    fn test_move_element() {
        let mut items = vec!['a', 'b', 'c', 'd'];

        items.move_element(0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);

        items.move_element(3, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);

        items.move_element(1, 1);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    #[should_panic(expected = "Cannot move from 4 to 0")]
    fn test_move_element_out_of_bounds() { vec![1, 2].move_element(4, 0); }

    #[test]
    fn test_apply_to_deque() {
        let old = ["a", "b", "c"];
        let new = ["c", "x", "a"];

        let mut built = VecDeque::from(old);
        built.apply_changes(changes_by_value(&old, &new)).unwrap();
        assert_eq!(built, VecDeque::from(new));
    }

    #[test]
    fn test_apply_unordered_move() {
        let mut items = vec!["a", "b", "c"];

        items
            .apply_changes([ChangeStep::Move {
                item: "a",
                from: 0,
                to: 2,
            }])
            .unwrap();
        assert_eq!(items, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_out_of_bounds_step_is_reported() {
        let mut items = vec![1, 2, 3];

        let result = items.apply_changes([
            ChangeStep::Delete { item: 3, at: 2 },
            ChangeStep::Update { item: 9, at: 2 },
        ]);

        assert_eq!(
            result,
            Err(ApplyError::IndexOutOfBounds {
                step: 1,
                index: 2,
                len: 2
            })
        );
        assert_eq!(items, vec![1, 2]);
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: u8,
        revision: u8,
    }

    fn entries() -> impl Strategy<Value = Vec<Entry>> {
        prop::collection::vec((0_u8..12, 0_u8..3), 0..30).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(id, revision)| Entry { id, revision })
                .collect::<Vec<_>>()
        })
    }

    proptest! {
        #[test]
        fn sequential_changes_build_new(
            old in prop::collection::vec(0_u8..10, 0..50),
            new in prop::collection::vec(0_u8..10, 0..50),
        ) {
            let mut built = old.clone();
            prop_assert_eq!(built.apply_changes(changes_by_value(&old, &new)), Ok(()));
            prop_assert_eq!(&built, &new);

            let mut rebuilt = new.clone();
            prop_assert_eq!(rebuilt.apply_changes(changes_by_value(&new, &old)), Ok(()));
            prop_assert_eq!(rebuilt, old);
        }

        #[test]
        fn sequential_changes_with_updates_build_new(old in entries(), new in entries()) {
            let steps = changes(&old, &new, |entry| entry.id, |a, b| a.revision != b.revision);

            let mut built = old.clone();
            prop_assert_eq!(built.apply_changes(steps), Ok(()));
            prop_assert_eq!(built, new);
        }

        #[test]
        fn identical_sequences_need_no_changes(items in prop::collection::vec(0_u8..10, 0..50)) {
            prop_assert!(changes_by_value(&items, &items).is_empty());
        }
    }
}
