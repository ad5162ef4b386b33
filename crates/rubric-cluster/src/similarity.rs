use std::collections::{BTreeMap, BTreeSet};

use rubric_model::CanonicalRow;
use serde::Serialize;

/// Co-occurrence of two rubric items across students.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSimilarity {
    pub rubric_item_a: String,
    pub rubric_item_b: String,
    pub jaccard: f64,
    pub corr: f64,
    pub cooccurrence: usize,
}

/// Rubric item to the distinct students who incurred it, keeping items with
/// at least `min_support` students.
pub fn incidence<T: AsRef<CanonicalRow>>(
    rows: &[T],
    min_support: usize,
) -> BTreeMap<&str, BTreeSet<&str>> {
    let mut incidence: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for row in rows {
        let row = row.as_ref();
        incidence
            .entry(row.rubric_item())
            .or_default()
            .insert(row.student_id());
    }
    incidence.retain(|_, students| students.len() >= min_support);
    incidence
}

/// `(jaccard, corr, cooccurrence)` of two student sets.
///
/// `corr` is the intersection over the geometric mean of the set sizes.
/// Both scores are 0 when either set is empty.
pub fn pair_similarity(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> (f64, f64, usize) {
    if a.is_empty() || b.is_empty() {
        return (0.0, 0.0, 0);
    }
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    let jaccard = inter as f64 / union as f64;
    let corr = inter as f64 / ((a.len() * b.len()) as f64).sqrt();
    (jaccard, corr, inter)
}
