//! Invariant check modules.
//!
//! Each module performs one check against a raw table.

mod identifiers;
mod points;
mod required;

use rubric_model::RawTable;

use crate::report::CheckResult;

/// Run all invariant checks in their fixed order.
pub fn run_all(table: &RawTable) -> Vec<CheckResult> {
    vec![
        // 1. Canonical column presence
        required::check(table),
        // 2. Blank identifiers
        identifiers::check(table),
        // 3. Non-numeric points_lost
        points::check_non_numeric(table),
        // 4. Negative points_lost
        points::check_negative(table),
    ]
}
