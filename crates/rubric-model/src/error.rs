//! Error taxonomy for schema resolution and normalization.
//!
//! Validation findings are not errors; they live in `rubric-validate` as data.

use thiserror::Error;

use crate::schema::CanonicalField;

/// Schema-level failures: the table cannot be interpreted without a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Required canonical columns are absent and mapping inference was disabled.
    #[error("mapping required to normalize this dataset (missing columns: {})", .missing.join(", "))]
    MappingRequired { missing: Vec<String> },

    /// A name that is not one of the eight canonical fields.
    #[error("unknown canonical field '{name}'")]
    UnknownField { name: String },
}

/// Fail-closed normalization errors. Any violation rejects the whole table.
///
/// Row numbers are 1-based data rows (the header is not counted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// One or more required canonical fields have no source column.
    #[error("missing required mapping for: {}", .fields.join(", "))]
    UnmappedFields { fields: Vec<String> },

    /// A declared source column does not exist in the input table.
    #[error("source columns not found: {}", .columns.join(", "))]
    SourceColumnsMissing { columns: Vec<String> },

    /// A table declared canonical lacks required canonical columns.
    #[error("table missing required columns: {}", .columns.join(", "))]
    MissingRequiredColumns { columns: Vec<String> },

    /// A required field is blank after trimming.
    #[error("missing required values in '{field}' (row {row})")]
    BlankRequiredValue { field: CanonicalField, row: usize },

    /// `points_lost` failed numeric coercion.
    #[error("points_lost column contains non-numeric value '{value}' (row {row})")]
    NonNumericPoints { row: usize, value: String },

    /// `points_lost` parsed but is below zero.
    #[error("points_lost must be non-negative (row {row}: {value})")]
    NegativePoints { row: usize, value: String },
}

impl MappingError {
    /// Attach a row number to a row construction failure.
    pub fn from_row(error: RowError, row: usize, raw_points: &str) -> Self {
        match error {
            RowError::BlankField { field } => Self::BlankRequiredValue { field, row },
            RowError::NegativePoints { .. } => Self::NegativePoints {
                row,
                value: raw_points.trim().to_string(),
            },
            RowError::NonFinitePoints => Self::NonNumericPoints {
                row,
                value: raw_points.trim().to_string(),
            },
        }
    }
}

/// Construction failure for a single [`crate::CanonicalRow`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("missing required value in '{field}'")]
    BlankField { field: CanonicalField },

    #[error("points_lost must be non-negative (got {value})")]
    NegativePoints { value: f64 },

    #[error("points_lost must be a finite number")]
    NonFinitePoints,
}
