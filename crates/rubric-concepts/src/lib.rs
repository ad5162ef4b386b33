#![deny(unsafe_code)]

//! Concept resolution for rubric deductions.
//!
//! A row's concept is its topic when present, otherwise the concept mapped
//! to its rubric item, otherwise the unmapped label. Concept mappings are
//! persisted as a flat JSON object and saved atomically.

mod error;
mod mapping;
mod resolver;
mod store;

pub use error::{ConceptMappingError, Result};
pub use mapping::{ConceptMapping, PLACEHOLDER_VALUES, is_placeholder, merge_updates};
pub use resolver::{
    ConceptCoverage, WorklistEntry, apply_concept_column, has_topic_values, mapping_worklist,
    unmapped_count, unmapped_rubric_items,
};
pub use store::{ConceptMappingStore, DEFAULT_CONCEPT_FILE};
