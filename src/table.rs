mod table_index;
mod table_section;

use std::{
    fmt::{self, Debug, Display},
    ops::{Index, IndexMut, Range},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
pub use table_index::TableIndex;
use table_section::SectionEntry;
pub use table_section::TableSection;

use crate::TableError;

/// A collection of rows organised into sections, the shape of data shown by
/// sectioned list and table views.
///
/// Rows live in a single backing array. Each section owns a contiguous,
/// non-overlapping slice of it and together the slices cover the whole array.
/// Empty sections are kept but skipped when walking the table row by row:
/// [`start_index`](Self::start_index) points at the first row of the first
/// non-empty section and [`end_index`](Self::end_index) right after the last
/// non-empty section.
///
/// Any change to the section structure rebuilds the table, so the skipping
/// invariant always holds.
#[derive(Clone, PartialEq, Eq)]
pub struct Table<S, R> {
    rows: Vec<R>,
    sections: Vec<SectionEntry<S>>,

    // Skipping empty sections
    section_start: usize,
    section_end: usize,
}

impl<S, R> Default for Table<S, R> {
    fn default() -> Self { Self::from_parts(Vec::new(), Vec::new()) }
}

impl<S, R> Table<S, R> {
    /// Creates a table without sections.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn from_parts(rows: Vec<R>, sections: Vec<SectionEntry<S>>) -> Self {
        debug_assert_eq!(
            sections.iter().map(|section| section.range.len()).sum::<usize>(),
            rows.len(),
            "Sections must cover every row"
        );

        let first_non_empty = sections.iter().position(|section| !section.range.is_empty());
        let last_non_empty = sections.iter().rposition(|section| !section.range.is_empty());

        Self {
            rows,
            sections,
            section_start: first_non_empty.unwrap_or(0),
            section_end: last_non_empty.map_or(0, |index| index + 1),
        }
    }

    /// Creates a table from `(section, rows)` pairs.
    ///
    /// ```
    /// use sectioned_diff::Table;
    ///
    /// let table = Table::from_sections([("1", vec![0, 1, 2]), ("2", vec![3, 4])]);
    /// assert_eq!(table.len(), 5);
    /// assert_eq!(table.section_count(), 2);
    /// ```
    pub fn from_sections<I>(sections: impl IntoIterator<Item = (S, I)>) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        let mut rows = Vec::new();
        let mut entries = Vec::new();

        for (value, section_rows) in sections {
            let offset = rows.len();
            rows.extend(section_rows);
            entries.push(SectionEntry {
                value,
                range: offset..rows.len(),
            });
        }

        Self::from_parts(rows, entries)
    }

    /// Creates a table from a flat list of rows. A new section starts at
    /// every row for which `section_value` returns a section.
    ///
    /// ```
    /// use sectioned_diff::Table;
    ///
    /// let table = Table::from_rows(0..10, |row| (row % 5 == 0).then(|| row / 5));
    /// assert_eq!(table.section_count(), 2);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `section_value` doesn't return a section for the first row.
    /// Use [`try_from_rows`](Self::try_from_rows) to handle this case.
    pub fn from_rows(
        rows: impl IntoIterator<Item = R>,
        section_value: impl FnMut(&R) -> Option<S>,
    ) -> Self {
        match Self::try_from_rows(rows, section_value) {
            Ok(table) => table,
            Err(error) => panic!("{error}"),
        }
    }

    /// Fallible version of [`from_rows`](Self::from_rows).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingLeadingSection`] if `section_value`
    /// doesn't return a section for the first row.
    pub fn try_from_rows(
        rows: impl IntoIterator<Item = R>,
        mut section_value: impl FnMut(&R) -> Option<S>,
    ) -> Result<Self, TableError> {
        let rows: Vec<R> = rows.into_iter().collect();

        let mut entries = Vec::new();
        let mut current: Option<(S, usize)> = None;

        for (index, row) in rows.iter().enumerate() {
            let Some(value) = section_value(row) else {
                if index == 0 {
                    return Err(TableError::MissingLeadingSection);
                }
                continue;
            };

            if let Some((previous, start)) = current.take() {
                entries.push(SectionEntry {
                    value: previous,
                    range: start..index,
                });
            }
            current = Some((value, index));
        }

        if let Some((previous, start)) = current {
            entries.push(SectionEntry {
                value: previous,
                range: start..rows.len(),
            });
        }

        Ok(Self::from_parts(rows, entries))
    }

    /// Number of rows across all sections.
    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Number of sections, including empty ones.
    pub fn section_count(&self) -> usize { self.sections.len() }

    pub fn section(&self, section: usize) -> Option<TableSection<'_, S, R>> {
        self.sections
            .get(section)
            .map(|entry| TableSection::new(&entry.value, &self.rows[entry.range.clone()]))
    }

    pub fn sections(
        &self,
    ) -> impl ExactSizeIterator<Item = TableSection<'_, S, R>> + DoubleEndedIterator {
        self.sections
            .iter()
            .map(|entry| TableSection::new(&entry.value, &self.rows[entry.range.clone()]))
    }

    /// Replaces every section of the table.
    pub fn set_sections<I>(&mut self, sections: impl IntoIterator<Item = (S, I)>)
    where
        I: IntoIterator<Item = R>,
    {
        *self = Self::from_sections(sections);
    }

    pub fn remove_empty_sections(&mut self) {
        let sections = std::mem::take(self).into_sections();
        *self = Self::from_sections(sections.into_iter().filter(|(_, rows)| !rows.is_empty()));
    }

    /// Splits the table into its `(section, rows)` pairs.
    pub fn into_sections(self) -> Vec<(S, Vec<R>)> {
        let mut rows = self.rows.into_iter();

        self.sections
            .into_iter()
            .map(|entry| {
                let section_rows = rows.by_ref().take(entry.range.len()).collect();
                (entry.value, section_rows)
            })
            .collect()
    }

    /// Iterates over every row, section by section.
    pub fn iter(&self) -> std::slice::Iter<'_, R> { self.rows.iter() }

    /// Index of the first row, skipping leading empty sections. Equals
    /// [`end_index`](Self::end_index) for a table without rows.
    pub fn start_index(&self) -> TableIndex { TableIndex::new(self.section_start, 0) }

    /// Index right after the last row, skipping trailing empty sections.
    pub fn end_index(&self) -> TableIndex { TableIndex::new(self.section_end, 0) }

    /// Index of the row following `index`, or [`end_index`](Self::end_index)
    /// if `index` points at the last row.
    pub fn index_after(&self, index: TableIndex) -> TableIndex {
        let Some(entry) = self.sections.get(index.section) else {
            return self.end_index();
        };

        if index.row + 1 < entry.range.len() {
            return TableIndex::new(index.section, index.row + 1);
        }

        self.sections
            .iter()
            .enumerate()
            .skip(index.section + 1)
            .find(|(_, entry)| !entry.range.is_empty())
            .map_or_else(|| self.end_index(), |(section, _)| TableIndex::new(section, 0))
    }

    /// Index of the row preceding `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` isn't after [`start_index`](Self::start_index).
    pub fn index_before(&self, index: TableIndex) -> TableIndex {
        assert!(
            index > self.start_index(),
            "Cannot step before the first row of the table"
        );

        if index.row > 0 {
            return TableIndex::new(index.section, index.row - 1);
        }

        let mut section = index.section - 1;
        while self.sections[section].range.is_empty() {
            section -= 1;
        }

        TableIndex::new(section, self.sections[section].range.len() - 1)
    }

    /// Advances `index` by `distance` rows.
    pub fn index_offset_by(&self, index: TableIndex, distance: usize) -> TableIndex {
        (0..distance).fold(index, |index, _| self.index_after(index))
    }

    /// Every valid row index in order.
    pub fn indices(&self) -> impl Iterator<Item = TableIndex> + '_ {
        let end = self.end_index();
        let start = Some(self.start_index()).filter(|start| *start != end);

        std::iter::successors(start, move |&index| {
            Some(self.index_after(index)).filter(|next| *next != end)
        })
    }

    /// Whether `index` points at an existing row.
    pub fn is_valid_index(&self, index: TableIndex) -> bool { self.flat_position(index).is_some() }

    pub fn get(&self, index: TableIndex) -> Option<&R> {
        self.flat_position(index).map(|position| &self.rows[position])
    }

    pub fn get_mut(&mut self, index: TableIndex) -> Option<&mut R> {
        self.flat_position(index)
            .map(|position| &mut self.rows[position])
    }

    /// Replaces the row at `index`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index` doesn't point at an existing row.
    pub fn set(&mut self, index: TableIndex, row: R) -> R {
        std::mem::replace(&mut self[index], row)
    }

    /// Checked version of [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::IndexOutOfBounds`] if `index` doesn't point at an
    /// existing row.
    pub fn try_set(&mut self, index: TableIndex, row: R) -> Result<R, TableError> {
        let error = self.out_of_bounds(index);
        self.get_mut(index)
            .map(|existing| std::mem::replace(existing, row))
            .ok_or(error)
    }

    /// Inserts `row` at `index`. Inserting at
    /// [`end_index`](Self::end_index) appends to the last non-empty section.
    ///
    /// # Panics
    ///
    /// Panics if `index` isn't a valid insertion point.
    pub fn insert(&mut self, index: TableIndex, row: R) {
        if let Err(error) = self.try_insert(index, row) {
            panic!("{error}");
        }
    }

    /// Checked version of [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::IndexOutOfBounds`] if `index` is neither inside
    /// or right after the rows of an existing section nor the end index.
    pub fn try_insert(&mut self, index: TableIndex, row: R) -> Result<(), TableError> {
        let is_insertion_point = !self.sections.is_empty()
            && (index == self.end_index()
                || self
                    .sections
                    .get(index.section)
                    .is_some_and(|entry| index.row <= entry.range.len()));

        if !is_insertion_point {
            return Err(self.out_of_bounds(index));
        }

        self.splice(index..index, [row]);
        Ok(())
    }

    /// Removes and returns the row at `index`. The section stays even if it
    /// becomes empty.
    ///
    /// # Panics
    ///
    /// Panics if `index` doesn't point at an existing row.
    pub fn remove(&mut self, index: TableIndex) -> R {
        match self.try_remove(index) {
            Ok(row) => row,
            Err(error) => panic!("{error}"),
        }
    }

    /// Checked version of [`remove`](Self::remove).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::IndexOutOfBounds`] if `index` doesn't point at an
    /// existing row.
    pub fn try_remove(&mut self, index: TableIndex) -> Result<R, TableError> {
        if !self.is_valid_index(index) {
            return Err(self.out_of_bounds(index));
        }

        let mut removed = self.splice(index..TableIndex::new(index.section, index.row + 1), []);
        debug_assert_eq!(removed.len(), 1, "Exactly one row must be removed");

        Ok(removed.swap_remove(0))
    }

    /// Removes the rows in `range`. See
    /// [`replace_subrange`](Self::replace_subrange).
    pub fn remove_subrange(&mut self, range: Range<TableIndex>) { self.splice(range, []); }

    /// Replaces the rows in `range` with `rows`.
    ///
    /// The sections spanned by `range` are merged into the first of them,
    /// which receives the rows before `range`, then `rows`, then the rows
    /// after `range`. Sections outside of `range` are left untouched. An
    /// exclusive end pointing at the first row of a section doesn't span that
    /// section.
    ///
    /// # Panics
    ///
    /// Panics if the table has no sections or `range` doesn't fit the table.
    pub fn replace_subrange(
        &mut self,
        range: Range<TableIndex>,
        rows: impl IntoIterator<Item = R>,
    ) {
        self.splice(range, rows);
    }

    fn splice(&mut self, range: Range<TableIndex>, rows: impl IntoIterator<Item = R>) -> Vec<R> {
        assert!(
            !self.sections.is_empty(),
            "Cannot replace rows of a table without sections"
        );

        let range = if range.is_empty() && range.start == self.end_index() && self.section_end > 0 {
            let last = self.section_end - 1;
            let past_last = TableIndex::new(last, self.sections[last].range.len());
            past_last..past_last
        } else {
            range
        };

        let lower = range.start;
        let upper = if range.end.row == 0 && !range.is_empty() {
            let section = range.end.section - 1;
            TableIndex::new(section, self.sections[section].range.len())
        } else {
            range.end
        };

        assert!(
            lower.section <= upper.section && upper.section < self.sections.len(),
            "Range {lower}..{upper} is out of bounds for a table with {} sections",
            self.sections.len()
        );

        let mut sections = std::mem::take(self).into_sections();
        let mut spanned = sections.drain(lower.section..=upper.section);

        let (value, mut combined) = spanned
            .next()
            .unwrap_or_else(|| unreachable!("The spanned section range is never empty"));

        let mut last_start = 0;
        for (_, section_rows) in spanned {
            last_start = combined.len();
            combined.extend(section_rows);
        }

        let removed = combined
            .splice(lower.row..last_start + upper.row, rows)
            .collect();

        sections.insert(lower.section, (value, combined));
        *self = Self::from_sections(sections);

        removed
    }

    /// Position of the row `index` in the backing array.
    fn flat_position(&self, index: TableIndex) -> Option<usize> {
        self.sections
            .get(index.section)
            .filter(|entry| index.row < entry.range.len())
            .map(|entry| entry.range.start + index.row)
    }

    fn out_of_bounds(&self, index: TableIndex) -> TableError {
        TableError::IndexOutOfBounds {
            index,
            section_count: self.sections.len(),
        }
    }

    /// Index of the first row equal to `row`.
    pub fn first_index_of(&self, row: &R) -> Option<TableIndex>
    where
        R: PartialEq,
    {
        let position = self.rows.iter().position(|candidate| candidate == row)?;

        self.sections
            .iter()
            .position(|entry| entry.range.contains(&position))
            .map(|section| TableIndex::new(section, position - self.sections[section].range.start))
    }

    /// Copies the rows in `range` into a new table.
    ///
    /// Sections before the range stay, possibly emptied. Sections after
    /// `range.end` are merged into the section holding the end of the range.
    pub fn sub_table(&self, range: Range<TableIndex>) -> Self
    where
        S: Clone,
        R: Clone,
    {
        let mut result = self.clone();
        if result.sections.is_empty() {
            return result;
        }

        result.splice(range.end..result.end_index(), []);
        result.splice(result.start_index()..range.start, []);

        result
    }
}

impl<S, R> Table<S, R>
where
    S: PartialEq,
{
    /// Creates a table from a flat list of rows, starting a new section
    /// whenever `section_value` returns a value different from the previous
    /// row's.
    ///
    /// ```
    /// use sectioned_diff::Table;
    ///
    /// let table = Table::from_rows_grouped(0..10, |row| row / 5);
    /// assert_eq!(table.section_count(), 2);
    /// ```
    pub fn from_rows_grouped(
        rows: impl IntoIterator<Item = R>,
        mut section_value: impl FnMut(&R) -> S,
    ) -> Self {
        let rows: Vec<R> = rows.into_iter().collect();
        let mut entries: Vec<SectionEntry<S>> = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let value = section_value(row);
            match entries.last_mut() {
                Some(last) if last.value == value => last.range.end = index + 1,
                _ => entries.push(SectionEntry {
                    value,
                    range: index..index + 1,
                }),
            }
        }

        Self::from_parts(rows, entries)
    }
}

impl<R> Table<(), R> {
    /// Creates a table holding `rows` in a single section without a value.
    pub fn with_rows(rows: impl IntoIterator<Item = R>) -> Self {
        Self::from_sections([((), rows)])
    }
}

impl<S, R> Index<TableIndex> for Table<S, R> {
    type Output = R;

    fn index(&self, index: TableIndex) -> &Self::Output {
        match self.flat_position(index) {
            Some(position) => &self.rows[position],
            None => panic!("Table index {index} is out of bounds"),
        }
    }
}

impl<S, R> IndexMut<TableIndex> for Table<S, R> {
    fn index_mut(&mut self, index: TableIndex) -> &mut Self::Output {
        match self.flat_position(index) {
            Some(position) => &mut self.rows[position],
            None => panic!("Table index {index} is out of bounds"),
        }
    }
}

impl<'a, S, R> IntoIterator for &'a Table<S, R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<S, R> Debug for Table<S, R>
where
    S: Debug,
    R: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.sections().map(|section| (section.value(), section.rows())))
            .finish()
    }
}

impl<S, R> Display for Table<S, R>
where
    S: Display,
    R: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for section in self.sections() {
            writeln!(f, "({}, [", section.value())?;
            for row in section {
                writeln!(f, "\t{row},")?;
            }
            write!(f, "]),")?;
        }
        write!(f, "]")
    }
}

#[cfg(feature = "serde")]
impl<S, R> Serialize for Table<S, R>
where
    S: Serialize,
    R: Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.collect_seq(self.sections().map(|section| (section.value(), section.rows())))
    }
}

#[cfg(feature = "serde")]
impl<'de, S, R> Deserialize<'de> for Table<S, R>
where
    S: Deserialize<'de>,
    R: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_sections(Vec::<(S, Vec<R>)>::deserialize(deserializer)?))
    }
}
