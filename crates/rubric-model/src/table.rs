//! Raw and canonical tables.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::row::CanonicalRow;
use crate::schema::{CANONICAL_COLUMNS, CanonicalField};

/// An untyped table: one header row plus string cells.
///
/// Every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Builds a table from string-like headers and rows.
    pub fn from_rows<I, R, S>(headers: &[&str], rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(headers.iter().map(|h| (*h).to_string()).collect());
        for row in rows {
            table.push_row(row.into_iter().map(Into::into).collect());
        }
        table
    }

    /// Appends a row, padding short rows with empty cells and dropping extras.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell text, or an empty string when the position is out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }

    /// All values of a column, or `None` if the column does not exist.
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).map_or("", String::as_str)))
    }
}

/// A validated table of canonical rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalTable {
    rows: Vec<CanonicalRow>,
}

impl CanonicalTable {
    pub fn new(rows: Vec<CanonicalRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[CanonicalRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<CanonicalRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRow> {
        self.rows.iter()
    }

    /// Distinct exam ids in lexicographic order.
    pub fn exam_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.exam_id())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Renders the table back to strings under the canonical header.
    pub fn to_raw(&self) -> RawTable {
        let mut raw = RawTable::new(CANONICAL_COLUMNS.iter().map(|c| (*c).to_string()).collect());
        for row in &self.rows {
            raw.push_row(CanonicalField::ALL.iter().map(|f| row.value(*f)).collect());
        }
        raw
    }
}

impl FromIterator<CanonicalRow> for CanonicalTable {
    fn from_iter<T: IntoIterator<Item = CanonicalRow>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CanonicalTable {
    type Item = &'a CanonicalRow;
    type IntoIter = std::slice::Iter<'a, CanonicalRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
