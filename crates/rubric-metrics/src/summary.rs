//! Descriptive summaries used by the analysis report.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rubric_model::CanonicalRow;
use serde::Serialize;

use crate::order::exam_rank;
use crate::stats::{mean, median, population_std, stable_sum};

// === Dataset overview ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub rows: usize,
    pub students: usize,
    pub exams: usize,
    pub questions: usize,
    /// `None` when there are no rows.
    pub avg_points_lost: Option<f64>,
}

pub fn overall_summary<T: AsRef<CanonicalRow>>(rows: &[T]) -> OverallSummary {
    let mut students = BTreeSet::new();
    let mut exams = BTreeSet::new();
    let mut questions = BTreeSet::new();
    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        let row = row.as_ref();
        students.insert(row.student_id());
        exams.insert(row.exam_id());
        questions.insert(row.question_id());
        points.push(row.points_lost());
    }
    OverallSummary {
        rows: rows.len(),
        students: students.len(),
        exams: exams.len(),
        questions: questions.len(),
        avg_points_lost: mean(&points),
    }
}

// === Per student ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentExamSummary {
    pub student_id: String,
    pub exam_id: String,
    pub total_points_lost: f64,
    pub questions: usize,
}

/// Points lost per (student, exam).
///
/// With an exam order, rows follow exam rank (unknown exams last) and then
/// descending total. Without one, descending total. Remaining ties break on
/// student then exam.
pub fn student_summary<T: AsRef<CanonicalRow>>(
    rows: &[T],
    exam_order: &[String],
) -> Vec<StudentExamSummary> {
    let mut groups: BTreeMap<(&str, &str), (Vec<f64>, BTreeSet<&str>)> = BTreeMap::new();
    for row in rows {
        let row = row.as_ref();
        let (points, questions) = groups.entry((row.student_id(), row.exam_id())).or_default();
        points.push(row.points_lost());
        questions.insert(row.question_id());
    }

    let mut summary: Vec<StudentExamSummary> = groups
        .into_iter()
        .map(|((student, exam), (points, questions))| StudentExamSummary {
            student_id: student.to_string(),
            exam_id: exam.to_string(),
            total_points_lost: stable_sum(points),
            questions: questions.len(),
        })
        .collect();

    let rank = exam_rank(exam_order);
    let rank_of = |exam: &str| rank.get(exam).copied().unwrap_or(usize::MAX);
    summary.sort_by(|a, b| {
        let by_rank = if rank.is_empty() {
            Ordering::Equal
        } else {
            rank_of(&a.exam_id).cmp(&rank_of(&b.exam_id))
        };
        by_rank
            .then_with(|| b.total_points_lost.total_cmp(&a.total_points_lost))
            .then_with(|| a.student_id.cmp(&b.student_id))
            .then_with(|| a.exam_id.cmp(&b.exam_id))
    });
    summary
}

// === Per rubric item ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricItemStats {
    pub rubric_item: String,
    pub topic: String,
    pub count: usize,
    pub avg_points_lost: f64,
    pub median_points_lost: f64,
    pub std_points_lost: f64,
    pub total_points_lost: f64,
}

/// Point statistics per (rubric item, topic), sorted by topic then item.
pub fn rubric_item_stats<T: AsRef<CanonicalRow>>(rows: &[T]) -> Vec<RubricItemStats> {
    let mut groups: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
    for row in rows {
        let row = row.as_ref();
        groups
            .entry((row.topic(), row.rubric_item()))
            .or_default()
            .push(row.points_lost());
    }
    groups
        .into_iter()
        .map(|((topic, item), points)| RubricItemStats {
            rubric_item: item.to_string(),
            topic: topic.to_string(),
            count: points.len(),
            avg_points_lost: mean(&points).unwrap_or(0.0),
            median_points_lost: median(&points).unwrap_or(0.0),
            std_points_lost: population_std(&points).unwrap_or(0.0),
            total_points_lost: stable_sum(points.iter().copied()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricErrorSummary {
    pub rubric_item: String,
    pub count_rows: usize,
    pub students_affected: usize,
    pub points_lost_total: f64,
    pub points_lost_mean: f64,
}

/// Frequency and cost of each rubric item, sorted by item.
pub fn summarize_errors<T: AsRef<CanonicalRow>>(rows: &[T]) -> Vec<RubricErrorSummary> {
    let mut groups: BTreeMap<&str, (BTreeSet<&str>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let row = row.as_ref();
        let (students, points) = groups.entry(row.rubric_item()).or_default();
        students.insert(row.student_id());
        points.push(row.points_lost());
    }
    groups
        .into_iter()
        .map(|(item, (students, points))| RubricErrorSummary {
            rubric_item: item.to_string(),
            count_rows: points.len(),
            students_affected: students.len(),
            points_lost_total: stable_sum(points.iter().copied()),
            points_lost_mean: mean(&points).unwrap_or(0.0),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamRubricTotal {
    pub exam_id: String,
    pub rubric_item: String,
    pub count_rows: usize,
    pub points_lost_total: f64,
}

pub fn error_by_exam<T: AsRef<CanonicalRow>>(rows: &[T]) -> Vec<ExamRubricTotal> {
    let mut groups: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
    for row in rows {
        let row = row.as_ref();
        groups
            .entry((row.exam_id(), row.rubric_item()))
            .or_default()
            .push(row.points_lost());
    }
    groups
        .into_iter()
        .map(|((exam, item), points)| ExamRubricTotal {
            exam_id: exam.to_string(),
            rubric_item: item.to_string(),
            count_rows: points.len(),
            points_lost_total: stable_sum(points),
        })
        .collect()
}

// === Per exam ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamBreakdown {
    pub exam_id: String,
    pub students: usize,
    pub questions: usize,
    pub total_points_lost: f64,
    pub avg_points_lost: f64,
}

pub fn exam_breakdown<T: AsRef<CanonicalRow>>(rows: &[T]) -> Vec<ExamBreakdown> {
    let mut groups: BTreeMap<&str, (BTreeSet<&str>, BTreeSet<&str>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let row = row.as_ref();
        let (students, questions, points) = groups.entry(row.exam_id()).or_default();
        students.insert(row.student_id());
        questions.insert(row.question_id());
        points.push(row.points_lost());
    }
    groups
        .into_iter()
        .map(|(exam, (students, questions, points))| ExamBreakdown {
            exam_id: exam.to_string(),
            students: students.len(),
            questions: questions.len(),
            total_points_lost: stable_sum(points.iter().copied()),
            avg_points_lost: mean(&points).unwrap_or(0.0),
        })
        .collect()
}

// === Score distribution ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBin {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of per-row `points_lost` in `bins` equal-width bins.
///
/// Bins are left-closed; the last bin also includes its upper edge. Empty
/// bins are kept. A single distinct value widens the range slightly so the
/// bins have non-zero width. Labels carry enough decimals to stay distinct.
pub fn score_distribution<T: AsRef<CanonicalRow>>(rows: &[T], bins: usize) -> Vec<DistributionBin> {
    if bins == 0 {
        return Vec::new();
    }
    let values: Vec<f64> = rows.iter().map(|row| row.as_ref().points_lost()).collect();
    let Some(min) = values.iter().copied().min_by(f64::total_cmp) else {
        return Vec::new();
    };
    let mut max = values.iter().copied().max_by(f64::total_cmp).unwrap_or(min);
    let mut low = min;
    if min == max {
        let pad = if min == 0.0 { 0.001 } else { 0.001 * min.abs() };
        low -= pad;
        max += pad;
    }
    let width = (max - low) / bins as f64;
    let decimals = label_decimals(width);

    let mut counts = vec![0usize; bins];
    for value in &values {
        let index = (((value - low) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| {
            let lower = low + width * index as f64;
            let upper = if index + 1 == bins {
                max
            } else {
                low + width * (index + 1) as f64
            };
            DistributionBin {
                label: format!("{lower:.decimals$}-{upper:.decimals$}"),
                lower,
                upper,
                count,
            }
        })
        .collect()
}

/// Decimal places needed for bin edges `width` apart to print differently.
fn label_decimals(width: f64) -> usize {
    let needed = (-width.log10()).ceil();
    if needed.is_finite() {
        needed.clamp(1.0, 6.0) as usize
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(student: &str, exam: &str, question: &str, item: &str, points: f64) -> CanonicalRow {
        CanonicalRow::new(student, exam, question, item, points).unwrap()
    }

    #[test]
    fn student_summary_orders_by_exam_rank_then_total() {
        let rows = vec![
            row("s1", "Final", "Q1", "A", 1.0),
            row("s2", "Final", "Q1", "A", 5.0),
            row("s1", "Midterm", "Q1", "A", 2.0),
            row("s1", "Midterm", "Q2", "B", 2.0),
            row("s3", "Bonus", "Q1", "A", 9.0),
        ];
        let order = ["Midterm", "Final"].map(String::from);
        let summary = student_summary(&rows, &order);
        let keys: Vec<(&str, &str)> = summary
            .iter()
            .map(|s| (s.student_id.as_str(), s.exam_id.as_str()))
            .collect();
        assert_eq!(
            keys,
            [("s1", "Midterm"), ("s2", "Final"), ("s1", "Final"), ("s3", "Bonus")]
        );
        assert_eq!(summary[0].questions, 2);

        let unordered = student_summary(&rows, &[]);
        assert_eq!(unordered[0].student_id, "s3");
    }

    #[test]
    fn distribution_counts_rows_not_totals() {
        let rows = vec![
            row("s1", "E1", "Q1", "A", 0.0),
            row("s1", "E1", "Q2", "B", 5.0),
            row("s2", "E1", "Q1", "A", 10.0),
            row("s3", "E1", "Q1", "A", 4.0),
        ];
        let bins = score_distribution(&rows, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].label, "0.0-5.0");
        assert_eq!(bins[1].label, "5.0-10.0");
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn distribution_single_value_keeps_every_row() {
        let rows = vec![
            row("s1", "E1", "Q1", "A", 10.0),
            row("s1", "E1", "Q2", "B", 10.0),
            row("s1", "E1", "Q3", "C", 10.0),
        ];
        let bins = score_distribution(&rows, 2);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_ne!(bins[0].label, bins[1].label);

        let zero = score_distribution(&[row("s1", "E1", "Q1", "A", 0.0)], 3);
        assert_eq!(zero.len(), 3);
        assert_eq!(zero.iter().map(|b| b.count).sum::<usize>(), 1);
        assert!(score_distribution::<CanonicalRow>(&[], 3).is_empty());
    }

    #[test]
    fn rubric_stats_use_population_std() {
        let rows = vec![
            row("s1", "E1", "Q1", "A", 1.0).with_topic("Loops"),
            row("s2", "E1", "Q1", "A", 3.0).with_topic("Loops"),
        ];
        let stats = rubric_item_stats(&rows);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].avg_points_lost, 2.0);
        assert_eq!(stats[0].median_points_lost, 2.0);
        assert_eq!(stats[0].std_points_lost, 1.0);
    }

    #[test]
    fn overall_summary_of_empty_rows() {
        let summary = overall_summary::<CanonicalRow>(&[]);
        assert_eq!(summary.rows, 0);
        assert_eq!(summary.avg_points_lost, None);
    }
}
