use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of a row within a [`Table`](crate::Table).
///
/// Ordered by section first, then by row.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TableIndex {
    pub section: usize,
    pub row: usize,
}

impl TableIndex {
    #[must_use]
    pub fn new(section: usize, row: usize) -> Self { Self { section, row } }
}

impl Display for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.section, self.row)
    }
}

impl From<(usize, usize)> for TableIndex {
    fn from((section, row): (usize, usize)) -> Self { Self { section, row } }
}
