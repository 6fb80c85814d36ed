//! Identity based diffing of two ordered sequences.
//!
//! Elements are matched through a symbol table keyed by a caller supplied
//! identity, in the spirit of Paul Heckel's "A technique for isolating
//! differences between files". Matching is near-linear and heuristic: it
//! favours the common list-editing patterns (appends, removals, reorders and
//! in-place updates) over a minimal edit script.

mod symbol;

use std::{hash::Hash, rc::Rc};

use symbol::{Entry, SymbolTable};

use crate::{ChangeStep, ordering::for_sequential_apply};

/// Returns the steps needed to build `new` from `old` without ordering them
/// for application.
///
/// Deletions come first in ascending old index order, followed by
/// insertions, moves and updates in new index order. Updates and the origin
/// of moves refer to positions in `old`; insertions and the destination of
/// moves refer to positions in `new`. Pass the result through one of the
/// [`ordering`](crate::ordering) policies before applying it.
///
/// `identifier` must be a stable function of an element's identity (not of
/// its content) for the duration of the call. An unstable identifier results
/// in poorer matching but never in a panic. `needs_update` is only consulted
/// for matched elements which kept their relative position.
///
/// ```
/// use sectioned_diff::{ChangeStep, unordered_changes};
///
/// let old = ["a", "b", "c"];
/// let new = ["c", "b", "a"];
///
/// let changes = unordered_changes(&old, &new, |item| *item, |_, _| false);
/// assert_eq!(
///     changes,
///     vec![
///         ChangeStep::Move { item: "c", from: 2, to: 0 },
///         ChangeStep::Move { item: "a", from: 0, to: 2 },
///     ]
/// );
/// ```
pub fn unordered_changes<'a, T, K>(
    old: &'a [T],
    new: &'a [T],
    mut identifier: impl FnMut(&'a T) -> K,
    mut needs_update: impl FnMut(&T, &T) -> bool,
) -> Vec<ChangeStep<T, usize>>
where
    T: Clone,
    K: Hash + Eq,
{
    let mut table = SymbolTable::with_capacity(old.len().max(new.len()));

    let mut new_entries: Vec<Entry> = Vec::with_capacity(new.len());
    for item in new {
        let id = table.id_for(identifier(item));
        let symbol = table.get_mut(id);
        symbol.new_counter = symbol.new_counter.incremented();
        new_entries.push(Entry::Symbol(id));
    }

    let mut old_entries: Vec<Entry> = Vec::with_capacity(old.len());
    for (index, item) in old.iter().enumerate() {
        let id = table.id_for(identifier(item));
        let symbol = table.get_mut(id);
        symbol.old_counter = symbol.old_counter.incremented();
        symbol.old_indexes.push_back(index);
        old_entries.push(Entry::Symbol(id));
    }

    pair_occurring_in_both(&mut table, &mut new_entries, &mut old_entries);
    propagate_forward(&mut new_entries, &mut old_entries);
    propagate_backward(&mut new_entries, &mut old_entries);

    let steps = emit_steps(old, new, &new_entries, &old_entries, &mut needs_update);

    debug!(
        old_len = old.len(),
        new_len = new.len(),
        steps = steps.len(),
        "diffed ordered sequences"
    );

    steps
}

/// Returns the steps needed to build `new` from `old`, ordered so that they
/// can be applied one by one to a copy of `old`.
///
/// See [`unordered_changes`] for the meaning of the closures and
/// [`for_sequential_apply`] for the ordering.
///
/// ```
/// use sectioned_diff::{ChangeStep, OrderedCollection, changes};
///
/// let old = vec!["a", "b", "c"];
/// let new = vec!["c", "a", "d"];
///
/// let steps = changes(&old, &new, |item| *item, |_, _| false);
///
/// let mut built = old.clone();
/// built.apply_changes(steps).unwrap();
/// assert_eq!(built, new);
/// ```
pub fn changes<'a, T, K>(
    old: &'a [T],
    new: &'a [T],
    identifier: impl FnMut(&'a T) -> K,
    needs_update: impl FnMut(&T, &T) -> bool,
) -> Vec<ChangeStep<T, usize>>
where
    T: Clone,
    K: Hash + Eq,
{
    for_sequential_apply(unordered_changes(old, new, identifier, needs_update))
}

/// [`changes`] for elements which are their own identity.
///
/// Equal identity implies equal content so no updates are produced.
pub fn changes_by_value<T>(old: &[T], new: &[T]) -> Vec<ChangeStep<T, usize>>
where
    T: Clone + Hash + Eq,
{
    changes(old, new, |item| item, |_, _| false)
}

/// [`unordered_changes`] for elements which are their own identity.
pub fn unordered_changes_by_value<T>(old: &[T], new: &[T]) -> Vec<ChangeStep<T, usize>>
where
    T: Clone + Hash + Eq,
{
    unordered_changes(old, new, |item| item, |_, _| false)
}

/// [`changes`] for shared elements identified by their allocation: two
/// elements are the same if they point to the same value.
pub fn changes_by_reference<T>(
    old: &[Rc<T>],
    new: &[Rc<T>],
    needs_update: impl FnMut(&Rc<T>, &Rc<T>) -> bool,
) -> Vec<ChangeStep<Rc<T>, usize>> {
    changes(old, new, Rc::as_ptr, needs_update)
}

/// Pairs every new slot whose identity also occurs in `old` with the
/// earliest unconsumed old position of the same identity.
fn pair_occurring_in_both<K>(
    table: &mut SymbolTable<K>,
    new_entries: &mut [Entry],
    old_entries: &mut [Entry],
) where
    K: Hash + Eq,
{
    for (new_index, entry) in new_entries.iter_mut().enumerate() {
        let Entry::Symbol(id) = *entry else {
            continue;
        };

        if !table.get(id).occurs_in_both() {
            continue;
        }

        if let Some(old_index) = table.get_mut(id).old_indexes.pop_front() {
            *entry = Entry::Index(old_index);
            old_entries[old_index] = Entry::Index(new_index);
        }
    }
}

/// Extends each pairing to the following neighbours when both of them are
/// still unpaired and share an identity. The first new slot is never used as
/// an anchor.
fn propagate_forward(new_entries: &mut [Entry], old_entries: &mut [Entry]) {
    for i in 1..new_entries.len().saturating_sub(1) {
        let Entry::Index(j) = new_entries[i] else {
            continue;
        };

        if j + 1 >= old_entries.len() {
            continue;
        }

        if let (Entry::Symbol(new_symbol), Entry::Symbol(old_symbol)) =
            (new_entries[i + 1], old_entries[j + 1])
            && new_symbol == old_symbol
        {
            new_entries[i + 1] = Entry::Index(j + 1);
            old_entries[j + 1] = Entry::Index(i + 1);
        }
    }
}

/// Mirror image of [`propagate_forward`], walking from the end.
fn propagate_backward(new_entries: &mut [Entry], old_entries: &mut [Entry]) {
    for i in (1..new_entries.len()).rev() {
        let Entry::Index(j) = new_entries[i] else {
            continue;
        };

        if j == 0 {
            continue;
        }

        if let (Entry::Symbol(new_symbol), Entry::Symbol(old_symbol)) =
            (new_entries[i - 1], old_entries[j - 1])
            && new_symbol == old_symbol
        {
            new_entries[i - 1] = Entry::Index(j - 1);
            old_entries[j - 1] = Entry::Index(i - 1);
        }
    }
}

fn emit_steps<T>(
    old: &[T],
    new: &[T],
    new_entries: &[Entry],
    old_entries: &[Entry],
    needs_update: &mut impl FnMut(&T, &T) -> bool,
) -> Vec<ChangeStep<T, usize>>
where
    T: Clone,
{
    let mut steps = Vec::new();

    // Number of deletions preceding each old position.
    let mut delete_offsets = Vec::with_capacity(old_entries.len());
    let mut running_offset = 0;
    for (index, entry) in old_entries.iter().enumerate() {
        delete_offsets.push(running_offset);
        if let Entry::Symbol(_) = entry {
            steps.push(ChangeStep::Delete {
                item: old[index].clone(),
                at: index,
            });
            running_offset += 1;
        }
    }

    let mut insert_offset = 0;
    for (index, entry) in new_entries.iter().enumerate() {
        match *entry {
            Entry::Symbol(_) => {
                steps.push(ChangeStep::Insert {
                    item: new[index].clone(),
                    at: index,
                });
                insert_offset += 1;
            }
            Entry::Index(old_index) => {
                let is_stable = old_index - delete_offsets[old_index] + insert_offset == index;

                if !is_stable {
                    steps.push(ChangeStep::Move {
                        item: new[index].clone(),
                        from: old_index,
                        to: index,
                    });
                } else if needs_update(&old[old_index], &new[index]) {
                    steps.push(ChangeStep::Update {
                        item: new[index].clone(),
                        at: old_index,
                    });
                }
            }
        }
    }

    steps
}
