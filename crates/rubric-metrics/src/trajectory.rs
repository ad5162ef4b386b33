use std::collections::BTreeMap;

use rubric_model::CanonicalRow;
use serde::Serialize;

use crate::order::{observed_exams, resolve_exam_order};
use crate::stats::stable_sum;

/// Total points lost on one exam, compared with the previous exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamChange {
    pub exam_id: String,
    pub total_points_lost: f64,
    /// `None` on the first exam.
    pub delta_vs_prev: Option<f64>,
    /// `None` on the first exam and when the previous total is zero.
    pub pct_change_vs_prev: Option<f64>,
}

/// Exam-over-exam change in total points lost, in effective exam order.
pub fn exam_changes<T: AsRef<CanonicalRow>>(rows: &[T], exam_order: &[String]) -> Vec<ExamChange> {
    let order = resolve_exam_order(&observed_exams(rows), exam_order);
    let mut points: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        let row = row.as_ref();
        points.entry(row.exam_id()).or_default().push(row.points_lost());
    }

    let mut changes = Vec::with_capacity(order.len());
    let mut previous: Option<f64> = None;
    for exam in order {
        let total = stable_sum(points.get(exam.as_str()).into_iter().flatten().copied());
        let delta = previous.map(|prev| total - prev);
        let pct = previous
            .filter(|prev| *prev != 0.0)
            .map(|prev| (total - prev) / prev);
        changes.push(ExamChange {
            exam_id: exam,
            total_points_lost: total,
            delta_vs_prev: delta,
            pct_change_vs_prev: pct,
        });
        previous = Some(total);
    }
    changes
}
