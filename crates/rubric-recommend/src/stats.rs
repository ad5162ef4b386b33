use std::collections::{BTreeMap, BTreeSet};

use rubric_metrics::stable_sum;
use rubric_model::ResolvedRow;
use serde::Serialize;

/// Aggregate cost of one concept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptStats {
    pub concept: String,
    pub rows: usize,
    pub students_affected: usize,
    pub points_lost_total: f64,
    pub points_lost_mean: f64,
    /// `points_lost_total * max(students_affected, 1)`.
    pub impact_score: f64,
}

/// Per-concept aggregates, sorted by concept.
pub fn concept_stats(rows: &[ResolvedRow]) -> Vec<ConceptStats> {
    let mut groups: BTreeMap<&str, (BTreeSet<&str>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let (students, points) = groups.entry(row.concept()).or_default();
        students.insert(row.row().student_id());
        points.push(row.row().points_lost());
    }
    groups
        .into_iter()
        .map(|(concept, (students, points))| {
            let total = stable_sum(points.iter().copied());
            let rows = points.len();
            ConceptStats {
                concept: concept.to_string(),
                rows,
                students_affected: students.len(),
                points_lost_total: total,
                points_lost_mean: total / rows as f64,
                impact_score: total * students.len().max(1) as f64,
            }
        })
        .collect()
}

/// Sorts by impact descending, ties by concept ascending.
pub(crate) fn rank_by_impact(stats: &mut [ConceptStats]) {
    stats.sort_by(|a, b| {
        b.impact_score
            .total_cmp(&a.impact_score)
            .then_with(|| a.concept.cmp(&b.concept))
    });
}

/// The `limit` highest-impact concepts.
pub fn top_concepts(rows: &[ResolvedRow], limit: usize) -> Vec<ConceptStats> {
    let mut stats = concept_stats(rows);
    rank_by_impact(&mut stats);
    stats.truncate(limit);
    stats
}

#[cfg(test)]
mod tests {
    use rubric_model::CanonicalRow;

    use super::*;

    fn resolved(student: &str, concept: &str, points: f64) -> ResolvedRow {
        ResolvedRow::new(CanonicalRow::new(student, "E1", "Q1", "item", points).unwrap(), concept)
    }

    #[test]
    fn impact_weights_by_students() {
        let rows = vec![
            resolved("s1", "Loops", 2.0),
            resolved("s2", "Loops", 1.0),
            resolved("s1", "Recursion", 4.0),
        ];
        let stats = concept_stats(&rows);
        assert_eq!(stats[0].concept, "Loops");
        assert_eq!(stats[0].students_affected, 2);
        assert_eq!(stats[0].impact_score, 6.0);
        assert_eq!(stats[0].points_lost_mean, 1.5);

        let top = top_concepts(&rows, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].concept, "Loops");
    }

    #[test]
    fn ties_break_on_concept_name() {
        let rows = vec![resolved("s1", "Zeta", 1.0), resolved("s2", "Alpha", 1.0)];
        let top = top_concepts(&rows, 5);
        assert_eq!(top[0].concept, "Alpha");
    }
}
