use rubric_model::{
    CanonicalTable, MappingConfig, MappingError, MappingSelection, REQUIRED_CANONICAL, RawTable,
    SchemaError,
};
use thiserror::Error;

use crate::apply::apply_mapping;
use crate::canonical::ensure_canonical_columns;
use crate::suggest::{needs_mapping, suggest_mapping};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Outcome of [`normalize_table`].
#[derive(Debug, Clone)]
pub struct Normalized {
    pub table: CanonicalTable,
    /// Mapping applied, or `None` when the canonical fast path was taken.
    pub mapping_used: Option<MappingConfig>,
    /// Heuristic suggestion, when one was computed.
    pub suggested: Option<MappingSelection>,
}

/// Normalizes an arbitrary table into canonical form.
///
/// Tables that already carry every required canonical column take the fast
/// path and ignore `mapping`. Otherwise the supplied mapping is applied; with
/// no mapping the heuristic suggestion is used when `infer` is set, and a
/// [`SchemaError`] is returned when it is not.
pub fn normalize_table(
    table: &RawTable,
    mapping: Option<&MappingConfig>,
    infer: bool,
) -> Result<Normalized, NormalizeError> {
    if !needs_mapping(table) {
        tracing::debug!("Table already canonical");
        return Ok(Normalized {
            table: ensure_canonical_columns(table)?,
            mapping_used: None,
            suggested: None,
        });
    }

    let (mapping, suggested) = match mapping {
        Some(mapping) => (mapping.clone(), None),
        None if infer => {
            let suggested = suggest_mapping(table);
            let mapping = MappingConfig::from_selection(&suggested)?;
            tracing::info!(
                columns = ?mapping.referenced_columns(),
                "Inferred column mapping"
            );
            (mapping, Some(suggested))
        }
        None => {
            let missing = REQUIRED_CANONICAL
                .iter()
                .filter(|column| !table.has_column(column))
                .map(|column| (*column).to_string())
                .collect();
            return Err(SchemaError::MappingRequired { missing }.into());
        }
    };

    let canonical = apply_mapping(table, &mapping)?;
    Ok(Normalized {
        table: canonical,
        mapping_used: Some(mapping),
        suggested,
    })
}
