#![deny(unsafe_code)]

//! Mapping from arbitrary rubric exports to the canonical schema.
//!
//! [`suggest_mapping`] guesses a source column per field from header
//! keywords, [`apply_mapping`] and [`ensure_canonical_columns`] coerce and
//! validate rows (fail-closed), and [`normalize_table`] chooses between them.

mod apply;
mod canonical;
mod hint;
mod normalize;
mod suggest;

pub use apply::apply_mapping;
pub use canonical::ensure_canonical_columns;
pub use hint::{MappingHintStore, StoredMappingHint};
pub use normalize::{NormalizeError, Normalized, normalize_table};
pub use suggest::{FIELD_KEYWORDS, needs_mapping, suggest_mapping};
