use std::collections::BTreeSet;

use rubric_model::{CanonicalTable, ResolvedRow};
use serde::Serialize;

use crate::mapping::ConceptMapping;

/// Attaches a concept to every row.
///
/// The concept is the row's topic when non-blank, else the mapped concept for
/// its rubric item, else `unmapped_label`.
pub fn apply_concept_column(
    table: &CanonicalTable,
    mapping: &ConceptMapping,
    unmapped_label: &str,
) -> Vec<ResolvedRow> {
    let resolved: Vec<ResolvedRow> = table
        .iter()
        .map(|row| {
            let topic = row.topic().trim();
            let concept = if topic.is_empty() {
                mapping
                    .get(row.rubric_item())
                    .map(str::trim)
                    .filter(|concept| !concept.is_empty())
                    .unwrap_or(unmapped_label)
            } else {
                topic
            };
            ResolvedRow::new(row.clone(), concept)
        })
        .collect();

    let unmapped = unmapped_count(&resolved, unmapped_label);
    if unmapped > 0 {
        tracing::warn!(
            rows = resolved.len(),
            unmapped,
            "Rows resolved to the unmapped concept"
        );
    }
    resolved
}

/// Number of rows whose concept is the unmapped label.
pub fn unmapped_count(rows: &[ResolvedRow], unmapped_label: &str) -> usize {
    rows.iter()
        .filter(|row| row.concept() == unmapped_label)
        .count()
}

/// Row counts split by whether a concept was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConceptCoverage {
    pub mapped: usize,
    pub unmapped: usize,
}

impl ConceptCoverage {
    pub fn of(rows: &[ResolvedRow], unmapped_label: &str) -> Self {
        let unmapped = unmapped_count(rows, unmapped_label);
        Self {
            mapped: rows.len() - unmapped,
            unmapped,
        }
    }
}

/// True when at least one row carries a non-blank topic.
pub fn has_topic_values(table: &CanonicalTable) -> bool {
    table.iter().any(|row| !row.topic().trim().is_empty())
}

/// Distinct rubric items, sorted, whose rows have neither a topic nor a mapping.
pub fn unmapped_rubric_items(table: &CanonicalTable, mapping: &ConceptMapping) -> Vec<String> {
    table
        .iter()
        .filter(|row| row.topic().trim().is_empty() && mapping.get(row.rubric_item()).is_none())
        .map(|row| row.rubric_item())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorklistEntry {
    pub rubric_item: String,
    pub concept: Option<String>,
}

/// Rubric items for a mapping editor, with their current concept.
///
/// Items are distinct and sorted; `filter` keeps items containing it,
/// ignoring case.
pub fn mapping_worklist(
    table: &CanonicalTable,
    mapping: &ConceptMapping,
    filter: &str,
) -> Vec<WorklistEntry> {
    let needle = filter.trim().to_lowercase();
    table
        .iter()
        .map(|row| row.rubric_item())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|item| item.to_lowercase().contains(&needle))
        .map(|item| WorklistEntry {
            rubric_item: item.to_string(),
            concept: mapping.get(item).map(str::to_string),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rubric_model::CanonicalRow;

    use super::*;

    fn table() -> CanonicalTable {
        [
            CanonicalRow::new("s1", "E1", "Q1", "Sign error", 1.0)
                .unwrap()
                .with_topic("Algebra"),
            CanonicalRow::new("s2", "E1", "Q1", "Sign error", 1.0).unwrap(),
            CanonicalRow::new("s3", "E1", "Q2", "No units", 0.5).unwrap(),
            CanonicalRow::new("s4", "E1", "Q3", "Bad limit", 2.0).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    fn mapping() -> ConceptMapping {
        ConceptMapping::try_from_entries([("Sign error", "Arithmetic")]).unwrap()
    }

    #[test]
    fn topic_then_mapping_then_label() {
        let resolved = apply_concept_column(&table(), &mapping(), "Unmapped");
        let concepts: Vec<&str> = resolved.iter().map(ResolvedRow::concept).collect();

        assert_eq!(concepts, vec!["Algebra", "Arithmetic", "Unmapped", "Unmapped"]);
        assert_eq!(unmapped_count(&resolved, "Unmapped"), 2);
        assert_eq!(
            ConceptCoverage::of(&resolved, "Unmapped"),
            ConceptCoverage {
                mapped: 2,
                unmapped: 2
            }
        );
    }

    #[test]
    fn unmapped_items_are_sorted_and_distinct() {
        assert_eq!(
            unmapped_rubric_items(&table(), &mapping()),
            vec!["Bad limit".to_string(), "No units".to_string()]
        );
    }

    #[test]
    fn worklist_filters_case_insensitively() {
        let worklist = mapping_worklist(&table(), &mapping(), "ERR");
        assert_eq!(
            worklist,
            vec![WorklistEntry {
                rubric_item: "Sign error".to_string(),
                concept: Some("Arithmetic".to_string()),
            }]
        );
        assert_eq!(mapping_worklist(&table(), &mapping(), "").len(), 3);
        assert!(has_topic_values(&table()));
    }
}
