//! File-backed concept mapping store.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ConceptMappingError, Result};
use crate::mapping::ConceptMapping;

/// Default file name for persisted concept mappings.
pub const DEFAULT_CONCEPT_FILE: &str = "concept_mappings.json";

/// Reads and atomically writes a concept mapping JSON file.
///
/// Single-writer: concurrent saves are not coordinated.
#[derive(Debug, Clone)]
pub struct ConceptMappingStore {
    path: PathBuf,
}

impl ConceptMappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the mapping, silently dropping blank keys and placeholder values.
    ///
    /// A missing file loads as an empty mapping. Non-string values are
    /// stringified before validation.
    pub fn load(&self) -> Result<ConceptMapping> {
        if !self.path.exists() {
            return Ok(ConceptMapping::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| ConceptMappingError::Io {
            operation: "read",
            path: self.path.clone(),
            source: e,
        })?;
        let value: Value =
            serde_json::from_str(&contents).map_err(|e| ConceptMappingError::Parse {
                path: self.path.clone(),
                source: e,
            })?;
        let Value::Object(object) = value else {
            return Err(ConceptMappingError::NotAnObject {
                path: self.path.clone(),
            });
        };

        let raw = object.into_iter().map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        });
        let (mapping, dropped) = ConceptMapping::normalize(raw);
        if !dropped.is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                dropped = dropped.len(),
                "Dropped invalid concept mapping entries"
            );
        }
        tracing::debug!(path = %self.path.display(), entries = mapping.len(), "Loaded concept mapping");
        Ok(mapping)
    }

    /// Validates and saves `entries`, returning the cleaned mapping.
    ///
    /// Any invalid entry rejects the whole save before the file is touched.
    /// The write goes to a temp file that is synced and renamed over the
    /// target, so the previous file survives any failure intact.
    pub fn save(&self, entries: &BTreeMap<String, String>) -> Result<ConceptMapping> {
        let mapping = ConceptMapping::try_from_entries(entries)?;
        let json = serde_json::to_string_pretty(&mapping)
            .map_err(|e| ConceptMappingError::Serialize { source: e })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConceptMappingError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        remove_on_error(&temp_path, write_synced(&temp_path, json.as_bytes()))?;

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(ConceptMappingError::AtomicWriteFailed {
                temp_path,
                target_path: self.path.clone(),
                source: e,
            });
        }

        tracing::info!(path = %self.path.display(), entries = mapping.len(), "Saved concept mapping");
        Ok(mapping)
    }
}

/// Writes `bytes` to `path` and syncs it to disk.
fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |operation: &'static str| {
        move |source: std::io::Error| ConceptMappingError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    };
    let mut file = File::create(path).map_err(io_error("create"))?;
    file.write_all(bytes).map_err(io_error("write"))?;
    file.sync_all().map_err(io_error("sync"))
}

/// Deletes a partially written temp file when `result` is an error.
fn remove_on_error<T>(temp_path: &Path, result: Result<T>) -> Result<T> {
    if result.is_err()
        && temp_path.exists()
        && let Err(e) = fs::remove_file(temp_path)
    {
        tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
    }
    result
}
