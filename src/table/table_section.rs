use std::ops::{Index, Range};

/// Bookkeeping for one section: its value and the slice of the backing row
/// array it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionEntry<S> {
    pub value: S,
    pub range: Range<usize>,
}

/// Borrowed view of one section of a [`Table`](crate::Table).
#[derive(Debug, PartialEq, Eq)]
pub struct TableSection<'a, S, R> {
    value: &'a S,
    rows: &'a [R],
}

impl<S, R> Clone for TableSection<'_, S, R> {
    fn clone(&self) -> Self { *self }
}

impl<S, R> Copy for TableSection<'_, S, R> {}

impl<'a, S, R> TableSection<'a, S, R> {
    pub(crate) fn new(value: &'a S, rows: &'a [R]) -> Self { Self { value, rows } }

    pub fn value(&self) -> &'a S { self.value }

    pub fn rows(&self) -> &'a [R] { self.rows }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn get(&self, row: usize) -> Option<&'a R> { self.rows.get(row) }

    pub fn iter(&self) -> std::slice::Iter<'a, R> { self.rows.iter() }
}

impl<S, R> Index<usize> for TableSection<'_, S, R> {
    type Output = R;

    fn index(&self, row: usize) -> &Self::Output { &self.rows[row] }
}

impl<'a, S, R> IntoIterator for TableSection<'a, S, R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter { self.rows.iter() }
}
