use std::fmt;

use serde::Serialize;

/// The invariants checked by the validator, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Invariant {
    RequiredColumns,
    MissingIdentifiers,
    NonNumericPointsLost,
    NegativePointsLost,
}

impl Invariant {
    pub const ALL: [Invariant; 4] = [
        Self::RequiredColumns,
        Self::MissingIdentifiers,
        Self::NonNumericPointsLost,
        Self::NegativePointsLost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequiredColumns => "required_columns",
            Self::MissingIdentifiers => "missing_identifiers",
            Self::NonNumericPointsLost => "non_numeric_points_lost",
            Self::NegativePointsLost => "negative_points_lost",
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a check found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckDetail {
    MissingColumns(Vec<String>),
    /// Number of offending rows.
    Count(usize),
}

impl fmt::Display for CheckDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns(columns) if columns.is_empty() => f.write_str("none missing"),
            Self::MissingColumns(columns) => write!(f, "missing: {}", columns.join(", ")),
            Self::Count(count) => write!(f, "{count} rows"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: Invariant,
    pub ok: bool,
    pub detail: CheckDetail,
}

impl CheckResult {
    pub fn missing_columns(name: Invariant, columns: Vec<String>) -> Self {
        Self {
            name,
            ok: columns.is_empty(),
            detail: CheckDetail::MissingColumns(columns),
        }
    }

    pub fn count(name: Invariant, count: usize) -> Self {
        Self {
            name,
            ok: count == 0,
            detail: CheckDetail::Count(count),
        }
    }
}

/// Ordered invariant results for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub results: Vec<CheckResult>,
}

impl ValidationReport {
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self { results }
    }

    pub fn passed(&self) -> bool {
        self.results.iter().all(|result| result.ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|result| !result.ok)
    }

    pub fn get(&self, name: Invariant) -> Option<&CheckResult> {
        self.results.iter().find(|result| result.name == name)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
