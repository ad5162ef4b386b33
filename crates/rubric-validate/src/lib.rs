#![deny(unsafe_code)]

//! Invariant checks over raw or normalized rubric tables.
//!
//! Findings are data, never errors: [`run_invariants`] always returns one
//! [`CheckResult`] per invariant and never mutates its input.

mod checks;
mod report;

use rubric_model::{CanonicalTable, RawTable};

pub use report::{CheckDetail, CheckResult, Invariant, ValidationReport};

/// Runs the four invariant checks in fixed order.
pub fn run_invariants(table: &RawTable) -> Vec<CheckResult> {
    checks::run_all(table)
}

/// Runs the invariants and wraps the results in a report.
pub fn validate(table: &RawTable) -> ValidationReport {
    let report = ValidationReport::new(run_invariants(table));
    tracing::info!(
        checks = report.len(),
        failed = report.failures().count(),
        "Invariant checks complete"
    );
    report
}

/// Re-checks an already normalized table.
pub fn validate_canonical(table: &CanonicalTable) -> ValidationReport {
    validate(&table.to_raw())
}
