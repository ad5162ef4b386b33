//! Last-used mapping hint.
//!
//! The hint is a single JSON file holding the most recently applied
//! [`MappingConfig`] plus the time it was saved. It is only offered for reuse
//! when every source column it references exists in the new table.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rubric_model::{MappingConfig, RawTable};
use serde::{Deserialize, Serialize};

/// A mapping with repository metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMappingHint {
    pub mapping: MappingConfig,
    pub saved_at: DateTime<Utc>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StoredMappingHint {
    pub fn new(mapping: MappingConfig) -> Self {
        Self {
            mapping,
            saved_at: Utc::now(),
            version: default_version(),
        }
    }
}

/// File-backed store for the last used mapping.
#[derive(Debug, Clone)]
pub struct MappingHintStore {
    path: PathBuf,
}

impl MappingHintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saves `mapping` as the new hint, replacing any previous one.
    pub fn save(&self, mapping: &MappingConfig) -> Result<StoredMappingHint> {
        let stored = StoredMappingHint::new(mapping.clone());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create hint directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(&stored)
            .context("Failed to serialize mapping hint")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write mapping hint to {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "Saved mapping hint");
        Ok(stored)
    }

    /// Loads the stored hint. Returns `None` if no hint has been saved.
    pub fn load(&self) -> Result<Option<StoredMappingHint>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read mapping hint from {}", self.path.display()))?;
        let stored: StoredMappingHint = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse mapping hint from {}", self.path.display()))?;
        Ok(Some(stored))
    }

    /// Loads the hint only if it applies to `table`.
    pub fn load_for(&self, table: &RawTable) -> Result<Option<MappingConfig>> {
        let Some(stored) = self.load()? else {
            return Ok(None);
        };
        if stored.mapping.applies_to(table) {
            Ok(Some(stored.mapping))
        } else {
            tracing::debug!(
                missing = ?stored.mapping.missing_columns(table),
                "Stored mapping hint does not fit this table"
            );
            Ok(None)
        }
    }
}
