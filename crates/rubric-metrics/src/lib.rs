#![deny(unsafe_code)]

//! Cross-exam metrics for canonical rubric rows.
//!
//! Functions take slices of anything that is `AsRef<CanonicalRow>`, so they
//! run on plain canonical rows and on concept-resolved rows alike. Insufficient
//! data (no rows, fewer than two exams) yields empty results, never errors.

mod groups;
mod order;
mod persistence;
mod scope;
mod stats;
mod summary;
mod trajectory;

pub use groups::{GroupColumn, GroupStats, disparity, group_comparison};
pub use order::{exam_rank, observed_exams, resolve_exam_order};
pub use persistence::{
    PersistenceRecord, concept_persistence, persistence_by, rubric_persistence, top_persistent,
};
pub use scope::{anonymize_students, filter_students};
pub use stats::{mean, median, population_std, stable_sum};
pub use summary::{
    DistributionBin, ExamBreakdown, ExamRubricTotal, OverallSummary, RubricErrorSummary,
    RubricItemStats, StudentExamSummary, error_by_exam, exam_breakdown, overall_summary,
    rubric_item_stats, score_distribution, student_summary, summarize_errors,
};
pub use trajectory::{ExamChange, exam_changes};
