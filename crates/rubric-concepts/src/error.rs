//! Concept mapping error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConceptMappingError {
    /// Entries with a blank key or a placeholder value. Keys are sorted.
    #[error("invalid concept values for: {}", .keys.join(", "))]
    InvalidEntries { keys: Vec<String> },

    /// The JSON root is not an object of rubric item to concept.
    #[error("concept mapping in {path} must be a JSON object of rubric_item -> concept")]
    NotAnObject { path: PathBuf },

    #[error("failed to parse concept mapping {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize concept mapping: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to {operation} concept mapping file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temp file was written but could not replace the target.
    #[error("failed to replace {target_path} with {temp_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConceptMappingError>;
