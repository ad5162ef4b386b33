//! Safe export file names.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IngestError, Result};

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid filename pattern"));

/// Returns a deterministic, filesystem-safe file name.
///
/// Path segments are joined with `_`, runs of characters outside
/// `[A-Za-z0-9._-]` become `_`, `..` collapses to `.` and leading dots are
/// stripped. An empty result becomes `export`. Any `..` segment is rejected.
pub fn sanitize_filename(name: &str) -> Result<String> {
    let normalized = name.trim().replace('\\', "/");
    let parts: Vec<&str> = normalized
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    if parts.contains(&"..") {
        return Err(IngestError::PathTraversal {
            name: name.to_string(),
        });
    }

    let mut cleaned = UNSAFE_RUN.replace_all(&parts.join("_"), "_").into_owned();
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", ".");
    }
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        Ok("export".to_string())
    } else {
        Ok(cleaned.to_string())
    }
}

/// Joins a sanitized name onto `base`, guaranteeing the result stays inside it.
pub fn build_export_path(base: &Path, name: &str) -> Result<PathBuf> {
    let safe = sanitize_filename(name)?;
    let path = base.join(&safe);
    let escapes = Path::new(&safe)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes || !path.starts_with(base) {
        return Err(IngestError::PathTraversal {
            name: name.to_string(),
        });
    }
    Ok(path)
}
