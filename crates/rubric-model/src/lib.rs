//! Canonical data model for rubric deduction exports.
//!
//! Every downstream stage (mapping, validation, concepts, metrics, clustering,
//! recommendations) consumes the types defined here:
//!
//! - [`RawTable`]: an untyped header + string-cell table as read from disk
//! - [`CanonicalRow`] / [`CanonicalTable`]: validated deduction events
//! - [`ResolvedRow`]: a canonical row with its derived concept label
//! - [`MappingConfig`]: source column per canonical field
//! - [`AnalysisOptions`]: knobs shared by the analytics stages

pub mod error;
pub mod mapping;
pub mod options;
pub mod row;
pub mod schema;
pub mod table;
pub mod text;

pub use error::{MappingError, RowError, SchemaError};
pub use mapping::{MappingConfig, MappingSelection};
pub use options::{AnalysisOptions, ClusterThresholds, DEFAULT_UNMAPPED_LABEL};
pub use row::{CanonicalRow, ResolvedRow};
pub use schema::{CANONICAL_COLUMNS, CanonicalField, REQUIRED_CANONICAL};
pub use table::{CanonicalTable, RawTable};
pub use text::{collapse_whitespace, format_numeric, parse_points};
