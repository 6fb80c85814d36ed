use std::{
    fmt::{self, Display},
    hash::Hash,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ApplyError, ChangeStep, Table, TableIndex, ordering::table_changes_for_batch_update,
    unordered_changes,
};

/// A change to a sectioned [`Table`]: either to its list of sections or to
/// the rows of one section.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableChange<S, R> {
    Section(ChangeStep<S, usize>),
    Row(ChangeStep<R, TableIndex>),
}

impl<S, R> TableChange<S, R> {
    pub fn is_section(&self) -> bool { matches!(self, TableChange::Section(_)) }

    pub fn is_row(&self) -> bool { matches!(self, TableChange::Row(_)) }
}

impl<S, R> Display for TableChange<S, R>
where
    S: Display,
    R: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableChange::Section(step) => write!(f, "Section: {step}"),
            TableChange::Row(step) => write!(f, "Row: {step}"),
        }
    }
}

impl<S, R> Table<S, R>
where
    S: Clone,
    R: Clone,
{
    /// Returns the changes needed to build `other` from `self`, unordered.
    ///
    /// Sections are diffed first. Sections kept in place on both sides are
    /// paired up in order and their rows are diffed against each other. Row
    /// deletions and updates are tagged with positions in `self`, row
    /// insertions with positions in `other`. A row move leaves from its old
    /// section and arrives in its new one. Inserted and moved sections get a
    /// row insertion for each of their rows.
    ///
    /// Pass the result to [`apply`](Self::apply) or order it with
    /// [`table_changes_for_batch_update`] before handing it to a list view.
    ///
    /// ```
    /// use sectioned_diff::{ChangeStep, Table, TableChange, TableIndex};
    ///
    /// let old = Table::from_sections([("A", vec![1])]);
    /// let new = Table::from_sections([("A", vec![1, 2]), ("B", vec![1])]);
    ///
    /// let changes = old.changes_to_build_by_value(&new);
    /// assert!(changes.contains(&TableChange::Section(ChangeStep::Insert { item: "B", at: 1 })));
    /// assert!(changes.contains(&TableChange::Row(ChangeStep::Insert {
    ///     item: 2,
    ///     at: TableIndex::new(0, 1)
    /// })));
    ///
    /// let mut built = old.clone();
    /// built.apply(changes).unwrap();
    /// assert_eq!(built, new);
    /// ```
    pub fn changes_to_build<'a, SK, RK>(
        &'a self,
        other: &'a Self,
        mut section_identifier: impl FnMut(&'a S) -> SK,
        mut section_needs_update: impl FnMut(&S, &S) -> bool,
        mut row_identifier: impl FnMut(&'a R) -> RK,
        mut row_needs_update: impl FnMut(&R, &R) -> bool,
    ) -> Vec<TableChange<S, R>>
    where
        SK: Hash + Eq,
        RK: Hash + Eq,
    {
        let old_values: Vec<&'a S> = self.sections().map(|section| section.value()).collect();
        let new_values: Vec<&'a S> = other.sections().map(|section| section.value()).collect();

        let section_steps = unordered_changes(
            &old_values,
            &new_values,
            |value| section_identifier(*value),
            |old, new| section_needs_update(old, new),
        );

        let mut departed = vec![false; self.section_count()];
        let mut arrived = vec![false; other.section_count()];
        for step in &section_steps {
            match *step {
                ChangeStep::Delete { at, .. } => departed[at] = true,
                ChangeStep::Insert { at, .. } => arrived[at] = true,
                ChangeStep::Move { from, to, .. } => {
                    departed[from] = true;
                    arrived[to] = true;
                }
                ChangeStep::Update { .. } => {}
            }
        }

        let mut changes: Vec<TableChange<S, R>> = section_steps
            .into_iter()
            .map(|step| TableChange::Section(step.map(Clone::clone)))
            .collect();

        let from_indices: Vec<usize> = (0..departed.len())
            .filter(|&index| !departed[index])
            .collect();
        let to_indices: Vec<usize> = (0..arrived.len())
            .filter(|&index| !arrived[index])
            .collect();
        debug_assert_eq!(
            from_indices.len(),
            to_indices.len(),
            "Sections kept in place must pair up"
        );

        for (&from_index, &to_index) in from_indices.iter().zip(&to_indices) {
            trace!(from_index, to_index, "diffing rows of paired sections");

            let (Some(old_section), Some(new_section)) =
                (self.section(from_index), other.section(to_index))
            else {
                continue;
            };

            let row_steps = unordered_changes(
                old_section.rows(),
                new_section.rows(),
                &mut row_identifier,
                &mut row_needs_update,
            );

            changes.extend(row_steps.into_iter().map(|step| {
                TableChange::Row(match step {
                    ChangeStep::Insert { item, at } => ChangeStep::Insert {
                        item,
                        at: TableIndex::new(to_index, at),
                    },
                    ChangeStep::Delete { item, at } => ChangeStep::Delete {
                        item,
                        at: TableIndex::new(from_index, at),
                    },
                    ChangeStep::Move { item, from, to } => ChangeStep::Move {
                        item,
                        from: TableIndex::new(from_index, from),
                        to: TableIndex::new(to_index, to),
                    },
                    ChangeStep::Update { item, at } => ChangeStep::Update {
                        item,
                        at: TableIndex::new(from_index, at),
                    },
                })
            }));
        }

        for (section, section_arrived) in arrived.into_iter().enumerate() {
            let Some(new_section) = other.section(section).filter(|_| section_arrived) else {
                continue;
            };

            changes.extend(new_section.iter().enumerate().map(|(row, item)| {
                TableChange::Row(ChangeStep::Insert {
                    item: item.clone(),
                    at: TableIndex::new(section, row),
                })
            }));
        }

        changes
    }

    /// Applies `changes` as returned by
    /// [`changes_to_build`](Self::changes_to_build).
    ///
    /// The changes are ordered with [`table_changes_for_batch_update`] first,
    /// so any ordering of them is accepted.
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyError`] if a change refers to a section or row which
    /// doesn't exist at the time it's applied. The changes applied up to that
    /// point are kept.
    pub fn apply(
        &mut self,
        changes: impl IntoIterator<Item = TableChange<S, R>>,
    ) -> Result<(), ApplyError> {
        let mut sections = std::mem::take(self).into_sections();
        let result = table_changes_for_batch_update(changes)
            .into_iter()
            .try_for_each(|change| apply_change(&mut sections, change));

        *self = Self::from_sections(sections);
        result
    }
}

impl<S, R> Table<S, R>
where
    S: Clone + Hash + Eq,
    R: Clone + Hash + Eq,
{
    /// [`changes_to_build`](Self::changes_to_build) for sections and rows
    /// which are their own identity.
    pub fn changes_to_build_by_value(&self, other: &Self) -> Vec<TableChange<S, R>> {
        self.changes_to_build(other, |section| section, |_, _| false, |row| row, |_, _| false)
    }
}

fn apply_change<S, R>(
    sections: &mut Vec<(S, Vec<R>)>,
    change: TableChange<S, R>,
) -> Result<(), ApplyError> {
    let section_count = sections.len();
    let section_out_of_bounds = |section| ApplyError::SectionOutOfBounds {
        section,
        section_count,
    };

    match change {
        TableChange::Section(ChangeStep::Update { item, at }) => {
            sections.get_mut(at).ok_or_else(|| section_out_of_bounds(at))?.0 = item;
        }
        TableChange::Section(ChangeStep::Delete { at, .. }) => {
            if at >= section_count {
                return Err(section_out_of_bounds(at));
            }
            sections.remove(at);
        }
        TableChange::Section(ChangeStep::Insert { item, at }) => {
            if at > section_count {
                return Err(section_out_of_bounds(at));
            }
            sections.insert(at, (item, Vec::new()));
        }
        TableChange::Section(ChangeStep::Move { item, from, to }) => {
            if from >= section_count || to >= section_count {
                return Err(section_out_of_bounds(from.max(to)));
            }
            let (_, rows) = sections.remove(from);
            sections.insert(to, (item, rows));
        }
        TableChange::Row(ChangeStep::Update { item, at }) => {
            *rows_of(sections, at)?
                .get_mut(at.row)
                .ok_or(ApplyError::RowOutOfBounds { index: at })? = item;
        }
        TableChange::Row(ChangeStep::Delete { at, .. }) => remove_row(sections, at).map(drop)?,
        TableChange::Row(ChangeStep::Insert { item, at }) => insert_row(sections, at, item)?,
        TableChange::Row(ChangeStep::Move { item, from, to }) => {
            remove_row(sections, from)?;
            insert_row(sections, to, item)?;
        }
    }

    Ok(())
}

fn rows_of<S, R>(
    sections: &mut [(S, Vec<R>)],
    index: TableIndex,
) -> Result<&mut Vec<R>, ApplyError> {
    let section_count = sections.len();
    sections
        .get_mut(index.section)
        .map(|(_, rows)| rows)
        .ok_or(ApplyError::SectionOutOfBounds {
            section: index.section,
            section_count,
        })
}

fn remove_row<S, R>(sections: &mut [(S, Vec<R>)], index: TableIndex) -> Result<R, ApplyError> {
    let rows = rows_of(sections, index)?;
    if index.row >= rows.len() {
        return Err(ApplyError::RowOutOfBounds { index });
    }
    Ok(rows.remove(index.row))
}

fn insert_row<S, R>(
    sections: &mut [(S, Vec<R>)],
    index: TableIndex,
    row: R,
) -> Result<(), ApplyError> {
    let rows = rows_of(sections, index)?;
    if index.row > rows.len() {
        return Err(ApplyError::RowOutOfBounds { index });
    }
    rows.insert(index.row, row);
    Ok(())
}
