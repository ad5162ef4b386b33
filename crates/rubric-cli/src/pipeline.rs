//! Analysis pipeline behind the `validate` and `analyze` commands.
//!
//! Stages run in a fixed order: normalize, scope students, validate,
//! resolve concepts, compute metrics, cluster, recommend.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info, info_span};

use rubric_cluster::{MisconceptionCluster, misconception_clusters};
use rubric_concepts::{ConceptCoverage, ConceptMapping, apply_concept_column, unmapped_rubric_items};
use rubric_ingest::{build_export_path, write_canonical_csv, write_records};
use rubric_map::{MappingHintStore, normalize_table};
use rubric_metrics::{
    GroupColumn, anonymize_students, concept_persistence, error_by_exam, exam_breakdown,
    exam_changes, filter_students, group_comparison, observed_exams, overall_summary,
    resolve_exam_order, rubric_item_stats, rubric_persistence, score_distribution,
    student_summary, summarize_errors, top_persistent,
};
use rubric_model::{
    AnalysisOptions, CanonicalField, MappingConfig, MappingSelection, RawTable, ResolvedRow,
    SchemaError,
};
use rubric_recommend::{compute_recommendations, lesson_plan, top_concepts};
use rubric_validate::validate_canonical;

use crate::logging::redact_value;
use crate::types::{AnalysisReport, ExportSummary};

/// Inputs for [`run_analysis`].
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub table: &'a RawTable,
    pub mapping: Option<&'a MappingConfig>,
    /// Fall back to the heuristic mapping when the table is not canonical.
    pub infer: bool,
    pub concepts: &'a ConceptMapping,
    pub options: &'a AnalysisOptions,
    /// Restrict the analysis to these students. Empty keeps everyone.
    pub students: &'a [String],
    pub anonymize: bool,
}

/// Splits `key=value` arguments. Values may be empty.
fn split_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => bail!("expected KEY=VALUE, got '{pair}'"),
    }
}

/// Parses `--map field=column` pairs. An empty column leaves the field unmapped.
pub fn parse_map_pairs(pairs: &[String]) -> Result<MappingSelection> {
    let mut selection = MappingSelection::new();
    for pair in pairs {
        let (field, column) = split_pair(pair)?;
        let field = CanonicalField::parse(field).ok_or_else(|| SchemaError::UnknownField {
            name: field.to_string(),
        })?;
        let column = (!column.is_empty()).then(|| column.to_string());
        selection.insert(field, column);
    }
    Ok(selection)
}

/// Parses `item=concept` pairs for the concept mapping editor.
pub fn parse_concept_pairs(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            let (item, concept) = split_pair(pair)?;
            Ok((item.to_string(), concept.to_string()))
        })
        .collect()
}

pub fn load_mapping_file(path: &Path) -> Result<MappingConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse mapping file {}", path.display()))
}

/// Picks the mapping to apply.
///
/// Inline pairs override entries from the mapping file. With neither, a
/// stored hint is reused if it fits `table`.
pub fn resolve_mapping(
    file: Option<&Path>,
    pairs: &[String],
    hint: Option<&MappingHintStore>,
    table: &RawTable,
) -> Result<Option<MappingConfig>> {
    let mut selection = match file {
        Some(path) => load_mapping_file(path)?.selection(),
        None => MappingSelection::new(),
    };
    selection.extend(parse_map_pairs(pairs)?);
    if file.is_some() || !pairs.is_empty() {
        let mapping = MappingConfig::from_selection(&selection).context("Invalid column mapping")?;
        return Ok(Some(mapping));
    }
    match hint {
        Some(store) => {
            let mapping = store.load_for(table)?;
            if mapping.is_some() {
                info!(path = %store.path().display(), "Reusing stored mapping hint");
            }
            Ok(mapping)
        }
        None => Ok(None),
    }
}

pub fn run_analysis(input: &AnalysisInput<'_>) -> Result<AnalysisReport> {
    let span = info_span!("analyze", rows = input.table.len());
    let _guard = span.enter();
    let options = input.options;

    // Stage 1: normalize
    let normalized =
        normalize_table(input.table, input.mapping, input.infer).context("Failed to normalize table")?;

    // Stage 2: scope
    let mut table = filter_students(&normalized.table, input.students);
    for student in input.students {
        debug!(student = redact_value(student), "Scoped analysis to student");
    }
    if input.anonymize {
        table = anonymize_students(&table).context("Failed to anonymize students")?;
    }

    // Stage 3: validate
    let validation = validate_canonical(&table);

    // Stage 4: concepts
    let resolved = apply_concept_column(&table, input.concepts, &options.unmapped_label);
    let coverage = ConceptCoverage::of(&resolved, &options.unmapped_label);
    let unmapped_items = unmapped_rubric_items(&table, input.concepts);

    // Stage 5: metrics
    let rows = table.rows();
    let exam_order = resolve_exam_order(&observed_exams(rows), &options.exam_order);
    let concept_records = concept_persistence(&resolved, &exam_order);
    let persistent = top_persistent(&concept_records, options.top_n);

    // Stage 6: clusters and recommendations
    let clusters = misconception_clusters(rows, &options.cluster);
    let eligible: Vec<ResolvedRow> = resolved
        .iter()
        .filter(|row| options.include_unmapped || row.concept() != options.unmapped_label)
        .cloned()
        .collect();
    let top = top_concepts(&eligible, options.top_n);
    let recommendations = compute_recommendations(&resolved, options);
    let plan = lesson_plan(&top, &persistent);

    info!(
        rows = table.len(),
        exams = exam_order.len(),
        concepts_unmapped = coverage.unmapped,
        recommendations = recommendations.len(),
        "Analysis complete"
    );
    Ok(AnalysisReport {
        mapping_used: normalized.mapping_used,
        validation,
        overall: overall_summary(rows),
        coverage,
        unmapped_items,
        rubric_stats: rubric_item_stats(rows),
        error_summary: summarize_errors(rows),
        error_by_exam: error_by_exam(rows),
        exam_breakdown: exam_breakdown(rows),
        student_summary: student_summary(rows, &exam_order),
        distribution: score_distribution(rows, options.distribution_bins),
        rubric_persistence: rubric_persistence(rows, &exam_order),
        concept_persistence: concept_records,
        exam_changes: exam_changes(rows, &exam_order),
        sections: group_comparison(rows, GroupColumn::Section, GroupColumn::Section.missing_label()),
        tas: group_comparison(rows, GroupColumn::Ta, GroupColumn::Ta.missing_label()),
        clusters,
        top_concepts: top,
        recommendations,
        lesson_plan: plan,
        exam_order,
        resolved,
        table,
    })
}

/// Flat cluster record for CSV export.
#[derive(Serialize)]
struct ClusterRecord<'a> {
    label: &'a str,
    members: String,
    size: usize,
    support_students: usize,
}

impl<'a> From<&'a MisconceptionCluster> for ClusterRecord<'a> {
    fn from(cluster: &'a MisconceptionCluster) -> Self {
        Self {
            label: &cluster.label,
            members: cluster.members.join("; "),
            size: cluster.size,
            support_students: cluster.support_students,
        }
    }
}

fn export<T: Serialize>(dir: &Path, name: &str, records: &[T], files: &mut Vec<PathBuf>) -> Result<()> {
    let path = build_export_path(dir, name)?;
    write_records(&path, records).with_context(|| format!("Failed to export {name}"))?;
    files.push(path);
    Ok(())
}

/// Writes the canonical table and every report section as CSV files.
pub fn write_exports(report: &AnalysisReport, output_dir: &Path) -> Result<ExportSummary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    let mut files = Vec::new();

    let canonical = build_export_path(output_dir, "canonical.csv")?;
    write_canonical_csv(&canonical, &report.table).context("Failed to export canonical table")?;
    files.push(canonical);

    export(output_dir, "summary_by_rubric.csv", &report.rubric_stats, &mut files)?;
    export(output_dir, "error_summary.csv", &report.error_summary, &mut files)?;
    export(output_dir, "error_by_exam.csv", &report.error_by_exam, &mut files)?;
    export(output_dir, "exam_breakdown.csv", &report.exam_breakdown, &mut files)?;
    export(output_dir, "student_summary.csv", &report.student_summary, &mut files)?;
    export(output_dir, "score_distribution.csv", &report.distribution, &mut files)?;
    export(output_dir, "rubric_persistence.csv", &report.rubric_persistence, &mut files)?;
    export(output_dir, "concept_persistence.csv", &report.concept_persistence, &mut files)?;
    export(output_dir, "exam_changes.csv", &report.exam_changes, &mut files)?;
    export(output_dir, "section_comparison.csv", &report.sections, &mut files)?;
    export(output_dir, "ta_comparison.csv", &report.tas, &mut files)?;
    let clusters: Vec<ClusterRecord<'_>> =
        report.clusters.clusters.iter().map(ClusterRecord::from).collect();
    export(output_dir, "misconception_clusters.csv", &clusters, &mut files)?;
    export(output_dir, "rubric_similarity.csv", &report.clusters.similarities, &mut files)?;
    export(output_dir, "top_concepts.csv", &report.top_concepts, &mut files)?;
    export(output_dir, "recommendations.csv", &report.recommendations, &mut files)?;

    info!(dir = %output_dir.display(), files = files.len(), "Exports written");
    Ok(ExportSummary {
        output_dir: output_dir.to_path_buf(),
        files,
    })
}
