use std::collections::{BTreeSet, HashMap};

use rubric_model::CanonicalRow;

/// Distinct exam ids present in `rows`, sorted.
pub fn observed_exams<T: AsRef<CanonicalRow>>(rows: &[T]) -> BTreeSet<&str> {
    rows.iter().map(|row| row.as_ref().exam_id()).collect()
}

/// Effective exam chronology.
///
/// The explicit order is filtered to observed exams, keeping the first
/// occurrence of duplicates. When nothing survives (or no order was given)
/// the observed exams are used in lexicographic order. Observed exams missing
/// from a non-empty explicit order are left out.
pub fn resolve_exam_order(observed: &BTreeSet<&str>, explicit: &[String]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for exam in explicit {
        let exam = exam.trim();
        if observed.contains(exam) && !order.iter().any(|seen| seen == exam) {
            order.push(exam.to_string());
        }
    }
    if order.is_empty() {
        order = observed.iter().map(|exam| (*exam).to_string()).collect();
    }
    order
}

/// Position of each exam in `order`.
pub fn exam_rank(order: &[String]) -> HashMap<&str, usize> {
    order
        .iter()
        .enumerate()
        .map(|(idx, exam)| (exam.as_str(), idx))
        .collect()
}
