use rubric_metrics::PersistenceRecord;

use crate::stats::ConceptStats;

/// Short lesson-plan hints from the highest-impact and most persistent concepts.
///
/// Both slices are expected in ranked order; only their first entries are used.
pub fn lesson_plan(top_concepts: &[ConceptStats], top_persistent: &[PersistenceRecord]) -> Vec<String> {
    let mut suggestions = Vec::new();
    if let Some(first) = top_concepts.first() {
        suggestions.push(format!(
            "Prioritize reteaching {}; it has the highest impact score ({:.1}).",
            first.concept, first.impact_score
        ));
    }
    if let Some(first) = top_persistent.first() {
        suggestions.push(format!(
            "Address recurring concept {}; repeat rate {:.0}% across {} students.",
            first.key,
            first.persistence_rate * 100.0,
            first.cohort_size
        ));
    }
    if suggestions.len() < 3 {
        suggestions.push(
            "Add 10-minute targeted practice on the top two concepts, then a quick formative check."
                .to_string(),
        );
    }
    suggestions.push(
        "Share anonymized exemplars for the highest-impact misconception to speed up feedback."
            .to_string(),
    );
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_still_give_generic_hints() {
        let plan = lesson_plan(&[], &[]);
        assert_eq!(plan.len(), 2);
        assert!(plan[0].starts_with("Add 10-minute"));
    }

    #[test]
    fn names_top_concept_and_repeat_rate() {
        let top = [ConceptStats {
            concept: "Loops".into(),
            rows: 2,
            students_affected: 2,
            points_lost_total: 3.0,
            points_lost_mean: 1.5,
            impact_score: 6.0,
        }];
        let persistent = [PersistenceRecord {
            key: "Recursion".into(),
            cohort_size: 4,
            repeated: 1,
            persistence_rate: 0.25,
        }];
        let plan = lesson_plan(&top, &persistent);
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0], "Prioritize reteaching Loops; it has the highest impact score (6.0).");
        assert_eq!(plan[1], "Address recurring concept Recursion; repeat rate 25% across 4 students.");
    }
}
