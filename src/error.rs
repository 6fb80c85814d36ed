use thiserror::Error;

use crate::TableIndex;

/// Error type for building or mutating a [`Table`](crate::Table) through its
/// checked entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The section assignment function didn't start a section at the first
    /// row, leaving it without a section.
    #[error("Invalid table: the first row must start a section")]
    MissingLeadingSection,

    /// The index doesn't point into (or, for insertions, right after) an
    /// existing section.
    #[error("Invalid table index {index}: the table has {section_count} sections")]
    IndexOutOfBounds {
        /// The offending index
        index: TableIndex,
        /// Number of sections in the table, including empty ones
        section_count: usize,
    },
}

/// Error type for applying a change list whose positions don't fit the
/// collection it's applied to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// A step of a flat change list points outside of the collection
    #[error(
        "Invalid change: step {step} refers to index {index}, but the collection only has {len} \
         elements at that point"
    )]
    IndexOutOfBounds {
        /// Position of the failing step in the applied change list
        step: usize,
        /// The index the step refers to
        index: usize,
        /// Length of the collection when the step was applied
        len: usize,
    },

    /// A section change points outside of the table
    #[error(
        "Invalid table change: section {section} is out of bounds for a table with {section_count} \
         sections"
    )]
    SectionOutOfBounds {
        /// The section index the change refers to
        section: usize,
        /// Number of sections when the change was applied
        section_count: usize,
    },

    /// A row change points outside of its section
    #[error("Invalid table change: row {index} is out of bounds")]
    RowOutOfBounds {
        /// The position the change refers to
        index: TableIndex,
    },
}
