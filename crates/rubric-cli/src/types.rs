use std::path::PathBuf;

use rubric_cluster::ClusterAnalysis;
use rubric_concepts::ConceptCoverage;
use rubric_metrics::{
    DistributionBin, ExamBreakdown, ExamChange, ExamRubricTotal, GroupStats, OverallSummary,
    PersistenceRecord, RubricErrorSummary, RubricItemStats, StudentExamSummary,
};
use rubric_model::{CanonicalTable, MappingConfig, ResolvedRow};
use rubric_recommend::{ConceptStats, Recommendation};
use rubric_validate::ValidationReport;

/// Everything the `analyze` command computes for one input table.
#[derive(Debug)]
pub struct AnalysisReport {
    pub table: CanonicalTable,
    pub resolved: Vec<ResolvedRow>,
    /// Mapping applied during normalization, `None` on the canonical fast path.
    pub mapping_used: Option<MappingConfig>,
    pub validation: ValidationReport,
    pub exam_order: Vec<String>,
    pub overall: OverallSummary,
    pub coverage: ConceptCoverage,
    pub unmapped_items: Vec<String>,
    pub rubric_stats: Vec<RubricItemStats>,
    pub error_summary: Vec<RubricErrorSummary>,
    pub error_by_exam: Vec<ExamRubricTotal>,
    pub exam_breakdown: Vec<ExamBreakdown>,
    pub student_summary: Vec<StudentExamSummary>,
    pub distribution: Vec<DistributionBin>,
    pub rubric_persistence: Vec<PersistenceRecord>,
    pub concept_persistence: Vec<PersistenceRecord>,
    pub exam_changes: Vec<ExamChange>,
    pub sections: Vec<GroupStats>,
    pub tas: Vec<GroupStats>,
    pub clusters: ClusterAnalysis,
    pub top_concepts: Vec<ConceptStats>,
    pub recommendations: Vec<Recommendation>,
    pub lesson_plan: Vec<String>,
}

/// Files written by an export run.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Result of the `validate` command.
#[derive(Debug)]
pub struct ValidateOutcome {
    /// Checks on the table as read. `required_columns` also lists absent
    /// optional columns, so exports that need a mapping always fail here.
    pub raw: ValidationReport,
    /// `None` when the table could not be normalized.
    pub normalized: Option<ValidationReport>,
    pub normalize_error: Option<String>,
}

impl ValidateOutcome {
    /// True when the table normalized and the normalized checks all pass.
    ///
    /// The raw report is informational and does not affect the outcome.
    pub fn passed(&self) -> bool {
        self.normalized
            .as_ref()
            .is_some_and(ValidationReport::passed)
    }
}
