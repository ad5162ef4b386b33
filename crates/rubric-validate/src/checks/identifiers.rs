//! Blank identifier detection.
//!
//! Absent identifier columns are skipped here; `required_columns` reports them.

use rubric_model::{CanonicalField, RawTable};

use crate::report::{CheckResult, Invariant};

pub fn check(table: &RawTable) -> CheckResult {
    let indices: Vec<usize> = CanonicalField::IDENTIFIERS
        .iter()
        .filter_map(|field| table.column_index(field.as_str()))
        .collect();
    let count = table
        .rows
        .iter()
        .filter(|row| {
            indices
                .iter()
                .any(|&idx| row.get(idx).is_none_or(|cell| cell.trim().is_empty()))
        })
        .count();
    CheckResult::count(Invariant::MissingIdentifiers, count)
}
