//! First-exam cohort persistence.
//!
//! For each key (rubric item or concept) the cohort is the set of students
//! with that key on the first exam of the effective order. A cohort student
//! is repeated when the key shows up for them on any later exam.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rubric_model::{CanonicalRow, ResolvedRow};
use serde::Serialize;

use crate::order::{exam_rank, observed_exams, resolve_exam_order};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistenceRecord {
    pub key: String,
    pub cohort_size: usize,
    pub repeated: usize,
    /// `repeated / cohort_size`, or 0 for an empty cohort.
    pub persistence_rate: f64,
}

#[derive(Default)]
struct Cohort<'a> {
    first: BTreeSet<&'a str>,
    later: BTreeSet<&'a str>,
}

/// Persistence per key, sorted by key.
///
/// Returns an empty result when fewer than two exams remain in the effective
/// order. Keys seen only on later exams are reported with an empty cohort.
pub fn persistence_by<T, F>(rows: &[T], exam_order: &[String], key: F) -> Vec<PersistenceRecord>
where
    T: AsRef<CanonicalRow>,
    F: Fn(&T) -> &str,
{
    let order = resolve_exam_order(&observed_exams(rows), exam_order);
    if order.len() < 2 {
        tracing::warn!(exams = order.len(), "Persistence needs at least two exams");
        return Vec::new();
    }
    let rank = exam_rank(&order);

    let mut cohorts: BTreeMap<&str, Cohort<'_>> = BTreeMap::new();
    for row in rows {
        let canonical = row.as_ref();
        let Some(&position) = rank.get(canonical.exam_id()) else {
            continue;
        };
        let cohort = cohorts.entry(key(row)).or_default();
        if position == 0 {
            cohort.first.insert(canonical.student_id());
        } else {
            cohort.later.insert(canonical.student_id());
        }
    }

    let records: Vec<PersistenceRecord> = cohorts
        .into_iter()
        .map(|(key, cohort)| {
            let cohort_size = cohort.first.len();
            let repeated = cohort.first.intersection(&cohort.later).count();
            let persistence_rate = if cohort_size == 0 {
                0.0
            } else {
                repeated as f64 / cohort_size as f64
            };
            PersistenceRecord {
                key: key.to_string(),
                cohort_size,
                repeated,
                persistence_rate,
            }
        })
        .collect();
    tracing::debug!(keys = records.len(), first_exam = %order[0], "Computed persistence");
    records
}

/// Persistence per rubric item.
pub fn rubric_persistence<T: AsRef<CanonicalRow>>(
    rows: &[T],
    exam_order: &[String],
) -> Vec<PersistenceRecord> {
    persistence_by(rows, exam_order, |row| row.as_ref().rubric_item())
}

/// Persistence per resolved concept.
pub fn concept_persistence(rows: &[ResolvedRow], exam_order: &[String]) -> Vec<PersistenceRecord> {
    persistence_by(rows, exam_order, |row| row.concept())
}

/// Highest persistence first, larger cohorts breaking ties.
pub fn top_persistent(records: &[PersistenceRecord], limit: usize) -> Vec<PersistenceRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        b.persistence_rate
            .partial_cmp(&a.persistence_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.cohort_size.cmp(&a.cohort_size))
            .then_with(|| a.key.cmp(&b.key))
    });
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(student: &str, exam: &str, item: &str) -> CanonicalRow {
        CanonicalRow::new(student, exam, "Q1", item, 1.0).unwrap()
    }

    #[test]
    fn single_exam_yields_nothing() {
        let rows = vec![row("s1", "E1", "A"), row("s2", "E1", "A")];
        assert!(rubric_persistence(&rows, &[]).is_empty());
    }

    #[test]
    fn first_exam_comes_from_effective_order() {
        let rows = vec![row("s1", "E2", "A"), row("s1", "E3", "A")];
        let order = ["E0".to_string(), "E2".to_string(), "E3".to_string()];
        let records = rubric_persistence(&rows, &order);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cohort_size, 1);
        assert_eq!(records[0].repeated, 1);
    }

    #[test]
    fn later_only_keys_have_zero_rate() {
        let rows = vec![row("s1", "E1", "A"), row("s2", "E2", "B")];
        let records = rubric_persistence(&rows, &[]);

        let b = records.iter().find(|r| r.key == "B").unwrap();
        assert_eq!(b.cohort_size, 0);
        assert_eq!(b.persistence_rate, 0.0);
    }

    #[test]
    fn exams_outside_explicit_order_are_ignored() {
        let rows = vec![
            row("s1", "E1", "A"),
            row("s1", "Bonus", "A"),
            row("s1", "E2", "B"),
        ];
        let order = ["E1".to_string(), "E2".to_string()];
        let records = rubric_persistence(&rows, &order);

        let a = records.iter().find(|r| r.key == "A").unwrap();
        assert_eq!(a.repeated, 0);
    }

    #[test]
    fn top_persistent_orders_by_rate_then_cohort() {
        let records = vec![
            PersistenceRecord { key: "A".into(), cohort_size: 2, repeated: 1, persistence_rate: 0.5 },
            PersistenceRecord { key: "B".into(), cohort_size: 1, repeated: 1, persistence_rate: 1.0 },
            PersistenceRecord { key: "C".into(), cohort_size: 4, repeated: 2, persistence_rate: 0.5 },
        ];
        let keys: Vec<String> = top_persistent(&records, 2).into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["B", "C"]);
    }
}
