//! Canonical column presence.

use rubric_model::{CANONICAL_COLUMNS, RawTable};

use crate::report::{CheckResult, Invariant};

/// Lists canonical columns (required and optional) absent from the header.
pub fn check(table: &RawTable) -> CheckResult {
    let missing = CANONICAL_COLUMNS
        .iter()
        .filter(|column| !table.has_column(column))
        .map(|column| (*column).to_string())
        .collect();
    CheckResult::missing_columns(Invariant::RequiredColumns, missing)
}
