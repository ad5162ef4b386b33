use std::collections::{BTreeSet, HashMap};

use rubric_metrics::{concept_persistence, observed_exams, resolve_exam_order};
use rubric_model::{AnalysisOptions, ResolvedRow};
use serde::Serialize;

use crate::action::Action;
use crate::stats::{concept_stats, rank_by_impact};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub concept: String,
    pub action: Action,
    pub impact_score: f64,
    pub students: usize,
    pub points_lost_total: f64,
    pub persistence_rate: f64,
}

/// Ranks concepts by impact and attaches a persistence-based action.
///
/// Rows labelled with `options.unmapped_label` are skipped unless
/// `options.include_unmapped` is set. `allowed_concepts`, when present,
/// restricts the candidates; blank entries are ignored and an allow-list with
/// no usable entries yields no recommendations. Persistence is computed over
/// the same scoped rows, so exams holding only skipped rows do not count.
pub fn compute_recommendations(rows: &[ResolvedRow], options: &AnalysisOptions) -> Vec<Recommendation> {
    let scoped: Vec<ResolvedRow> = rows
        .iter()
        .filter(|row| options.include_unmapped || row.concept() != options.unmapped_label)
        .cloned()
        .collect();

    let mut stats = concept_stats(&scoped);
    if let Some(allowed_concepts) = &options.allowed_concepts {
        let allowed: BTreeSet<&str> = allowed_concepts
            .iter()
            .map(|concept| concept.trim())
            .filter(|concept| !concept.is_empty())
            .collect();
        stats.retain(|entry| allowed.contains(entry.concept.as_str()));
    }
    if stats.is_empty() {
        tracing::debug!(rows = scoped.len(), "No concepts eligible for recommendation");
        return Vec::new();
    }
    rank_by_impact(&mut stats);
    stats.truncate(options.top_n);

    let order = resolve_exam_order(&observed_exams(&scoped), &options.exam_order);
    let persistence = concept_persistence(&scoped, &order);
    let rate_of: HashMap<&str, f64> = persistence
        .iter()
        .map(|record| (record.key.as_str(), record.persistence_rate))
        .collect();

    let recommendations: Vec<Recommendation> = stats
        .into_iter()
        .map(|entry| {
            let persistence_rate = rate_of.get(entry.concept.as_str()).copied().unwrap_or(0.0);
            Recommendation {
                action: Action::for_persistence(persistence_rate, options.persistence_threshold),
                impact_score: entry.impact_score,
                students: entry.students_affected,
                points_lost_total: entry.points_lost_total,
                persistence_rate,
                concept: entry.concept,
            }
        })
        .collect();
    tracing::info!(
        recommendations = recommendations.len(),
        re_teach = recommendations
            .iter()
            .filter(|r| r.action == Action::ReTeach)
            .count(),
        "Computed recommendations"
    );
    recommendations
}
