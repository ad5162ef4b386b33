use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rubric_model::CanonicalRow;
use serde::Serialize;

use crate::stats::{mean, stable_sum};

/// Optional column used to compare grading across groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupColumn {
    Section,
    Ta,
}

impl GroupColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Section => "section_id",
            Self::Ta => "ta_id",
        }
    }

    /// Default label for rows with a blank group value.
    pub fn missing_label(self) -> &'static str {
        match self {
            Self::Section => "Unassigned Section",
            Self::Ta => "Unassigned TA",
        }
    }

    fn value(self, row: &CanonicalRow) -> &str {
        match self {
            Self::Section => row.section_id(),
            Self::Ta => row.ta_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub group: String,
    pub rows: usize,
    pub students: usize,
    pub total_points_lost: f64,
    pub avg_points_per_student: f64,
    pub avg_points_per_row: f64,
}

/// Aggregates points lost per group value, highest per-student average first.
///
/// Blank group values are reported under `missing_label`.
pub fn group_comparison<T: AsRef<CanonicalRow>>(
    rows: &[T],
    column: GroupColumn,
    missing_label: &str,
) -> Vec<GroupStats> {
    let mut groups: BTreeMap<&str, (BTreeSet<&str>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let row = row.as_ref();
        let value = column.value(row).trim();
        let label = if value.is_empty() { missing_label } else { value };
        let (students, points) = groups.entry(label).or_default();
        students.insert(row.student_id());
        points.push(row.points_lost());
    }

    let mut stats: Vec<GroupStats> = groups
        .into_iter()
        .map(|(group, (students, points))| {
            let total = stable_sum(points.iter().copied());
            GroupStats {
                group: group.to_string(),
                rows: points.len(),
                students: students.len(),
                total_points_lost: total,
                avg_points_per_student: if students.is_empty() {
                    0.0
                } else {
                    total / students.len() as f64
                },
                avg_points_per_row: mean(&points).unwrap_or(0.0),
            }
        })
        .collect();
    stats.sort_by(|a, b| {
        b.avg_points_per_student
            .partial_cmp(&a.avg_points_per_student)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.group.cmp(&b.group))
    });
    stats
}

/// Spread between the highest and lowest per-student average.
pub fn disparity(stats: &[GroupStats]) -> Option<f64> {
    let max = stats
        .iter()
        .map(|s| s.avg_points_per_student)
        .max_by(f64::total_cmp)?;
    let min = stats
        .iter()
        .map(|s| s.avg_points_per_student)
        .min_by(f64::total_cmp)?;
    Some(max - min)
}
