//! Source-column mapping for canonical fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::schema::CanonicalField;
use crate::table::RawTable;

/// A possibly incomplete mapping, as produced by suggestion or read from disk.
pub type MappingSelection = BTreeMap<CanonicalField, Option<String>>;

/// A complete mapping: every required field has a source column.
///
/// Optional fields may be left unmapped. Serialized as a
/// [`MappingSelection`] with explicit `null` entries for unmapped fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MappingSelection", into = "MappingSelection")]
pub struct MappingConfig {
    sources: BTreeMap<CanonicalField, String>,
}

impl MappingConfig {
    /// Validates a selection, listing every required field left unmapped.
    ///
    /// Blank column names count as unmapped.
    pub fn from_selection(selection: &MappingSelection) -> Result<Self, MappingError> {
        let sources: BTreeMap<CanonicalField, String> = selection
            .iter()
            .filter_map(|(field, column)| {
                let column = column.as_deref()?.trim();
                (!column.is_empty()).then(|| (*field, column.to_string()))
            })
            .collect();
        let missing: Vec<String> = CanonicalField::REQUIRED
            .iter()
            .filter(|field| !sources.contains_key(*field))
            .map(|field| field.as_str().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(MappingError::UnmappedFields { fields: missing });
        }
        Ok(Self { sources })
    }

    /// The identity mapping for a table already in canonical shape.
    pub fn identity(table: &RawTable) -> Self {
        let sources = CanonicalField::ALL
            .iter()
            .filter(|field| table.has_column(field.as_str()))
            .map(|field| (*field, field.as_str().to_string()))
            .collect();
        Self { sources }
    }

    /// Source column for a field, if mapped.
    pub fn source(&self, field: CanonicalField) -> Option<&str> {
        self.sources.get(&field).map(String::as_str)
    }

    pub fn sources(&self) -> &BTreeMap<CanonicalField, String> {
        &self.sources
    }

    /// Full selection over all eight fields, `None` where unmapped.
    pub fn selection(&self) -> MappingSelection {
        CanonicalField::ALL
            .iter()
            .map(|field| (*field, self.sources.get(field).cloned()))
            .collect()
    }

    /// Distinct source columns in field order.
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for column in self.sources.values() {
            if !seen.contains(&column.as_str()) {
                seen.push(column.as_str());
            }
        }
        seen
    }

    /// Source columns that `table` does not have.
    pub fn missing_columns(&self, table: &RawTable) -> Vec<String> {
        self.referenced_columns()
            .into_iter()
            .filter(|column| !table.has_column(column))
            .map(str::to_string)
            .collect()
    }

    /// True when every referenced column exists in `table`.
    pub fn applies_to(&self, table: &RawTable) -> bool {
        self.missing_columns(table).is_empty()
    }
}

impl TryFrom<MappingSelection> for MappingConfig {
    type Error = MappingError;

    fn try_from(selection: MappingSelection) -> Result<Self, Self::Error> {
        Self::from_selection(&selection)
    }
}

impl From<MappingConfig> for MappingSelection {
    fn from(config: MappingConfig) -> Self {
        config.selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(pairs: &[(CanonicalField, &str)]) -> MappingSelection {
        pairs
            .iter()
            .map(|(field, column)| (*field, Some((*column).to_string())))
            .collect()
    }

    #[test]
    fn missing_required_fields_are_all_listed() {
        let sel = selection(&[
            (CanonicalField::StudentId, "SID"),
            (CanonicalField::RubricItem, "Rubric"),
        ]);
        let err = MappingConfig::from_selection(&sel).unwrap_err();
        assert_eq!(
            err,
            MappingError::UnmappedFields {
                fields: vec![
                    "exam_id".to_string(),
                    "question_id".to_string(),
                    "points_lost".to_string(),
                ],
            }
        );
    }

    #[test]
    fn blank_column_counts_as_unmapped() {
        let mut sel = selection(&[
            (CanonicalField::StudentId, "SID"),
            (CanonicalField::ExamId, "Exam"),
            (CanonicalField::QuestionId, "Q"),
            (CanonicalField::RubricItem, "Rubric"),
        ]);
        sel.insert(CanonicalField::PointsLost, Some("  ".to_string()));
        assert!(MappingConfig::from_selection(&sel).is_err());
    }

    #[test]
    fn shared_source_column_is_referenced_once() {
        let sel = selection(&[
            (CanonicalField::StudentId, "SID"),
            (CanonicalField::ExamId, "Exam"),
            (CanonicalField::QuestionId, "Exam"),
            (CanonicalField::RubricItem, "Rubric"),
            (CanonicalField::PointsLost, "Pts"),
        ]);
        let config = MappingConfig::from_selection(&sel).unwrap();
        assert_eq!(config.referenced_columns(), vec!["SID", "Exam", "Rubric", "Pts"]);
        assert_eq!(config.selection().len(), 8);
        assert_eq!(config.source(CanonicalField::Topic), None);
    }
}
