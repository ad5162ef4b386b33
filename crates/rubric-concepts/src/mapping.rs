use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ConceptMappingError, Result};

/// Values that stand in for a concept without naming one. Compared
/// case-insensitively after trimming.
pub const PLACEHOLDER_VALUES: [&str; 9] =
    ["", "none", "null", "nil", "n/a", "na", "yes", "true", "false"];

/// True when `value` is blank or a placeholder token.
pub fn is_placeholder(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    PLACEHOLDER_VALUES.iter().any(|token| *token == lowered)
}

/// Validated rubric item to concept mapping.
///
/// Keys and values are trimmed, keys are non-blank and no value is a
/// placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConceptMapping {
    entries: BTreeMap<String, String>,
}

impl ConceptMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits raw entries into a cleaned mapping and the rejected entries.
    ///
    /// Rejected entries keep their raw key when it is blank and the trimmed
    /// key otherwise.
    pub fn normalize<I, K, V>(raw: I) -> (Self, BTreeMap<String, String>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = BTreeMap::new();
        let mut invalid = BTreeMap::new();
        for (raw_key, raw_value) in raw {
            let key = raw_key.as_ref().trim();
            let value = raw_value.as_ref().trim();
            if key.is_empty() {
                invalid.insert(raw_key.as_ref().to_string(), value.to_string());
            } else if is_placeholder(value) {
                invalid.insert(key.to_string(), value.to_string());
            } else {
                entries.insert(key.to_string(), value.to_string());
            }
        }
        (Self { entries }, invalid)
    }

    /// Validates raw entries, rejecting the whole set if any entry is invalid.
    pub fn try_from_entries<I, K, V>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (mapping, invalid) = Self::normalize(raw);
        if invalid.is_empty() {
            Ok(mapping)
        } else {
            Err(ConceptMappingError::InvalidEntries {
                keys: invalid.into_keys().collect(),
            })
        }
    }

    pub fn get(&self, rubric_item: &str) -> Option<&str> {
        self.entries.get(rubric_item).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct concept names in sorted order.
    pub fn concepts(&self) -> Vec<&str> {
        let mut concepts: Vec<&str> = self.entries.values().map(String::as_str).collect();
        concepts.sort_unstable();
        concepts.dedup();
        concepts
    }
}

/// Overlays `updates` on `existing`. Blank update values are ignored.
///
/// The result is unvalidated; pass it to
/// [`ConceptMappingStore::save`](crate::ConceptMappingStore::save).
pub fn merge_updates(
    existing: &ConceptMapping,
    updates: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = existing.entries.clone();
    for (item, concept) in updates {
        let concept = concept.trim();
        if !concept.is_empty() {
            merged.insert(item.trim().to_string(), concept.to_string());
        }
    }
    merged
}
