//! Integration tests for the analysis pipeline.

use std::fs;

use rubric_cli::pipeline::{AnalysisInput, resolve_mapping, run_analysis, write_exports};
use rubric_cli::types::{AnalysisReport, ValidateOutcome};
use rubric_concepts::ConceptMapping;
use rubric_map::MappingHintStore;
use rubric_model::{AnalysisOptions, RawTable};
use rubric_recommend::Action;
use rubric_validate::{validate, validate_canonical};
use tempfile::TempDir;

const CANONICAL: [&str; 6] = [
    "student_id",
    "exam_id",
    "question_id",
    "rubric_item",
    "points_lost",
    "section_id",
];

fn scenario_table() -> RawTable {
    RawTable::from_rows(
        &CANONICAL,
        [
            ["s1", "E1", "Q1", "A", "1", "101"],
            ["s1", "E2", "Q1", "A", "2", "101"],
            ["s2", "E1", "Q1", "A", "0.5", "101"],
            ["s2", "E2", "Q1", "B", "1", "102"],
            ["s3", "E1", "Q1", "B", "1", ""],
            ["s3", "E2", "Q1", "B", "1.5", ""],
        ],
    )
}

fn concepts() -> ConceptMapping {
    ConceptMapping::try_from_entries([("A", "Loops"), ("B", "Recursion")]).expect("valid mapping")
}

fn analyze(table: &RawTable, options: &AnalysisOptions, anonymize: bool) -> AnalysisReport {
    let concepts = concepts();
    run_analysis(&AnalysisInput {
        table,
        mapping: None,
        infer: true,
        concepts: &concepts,
        options,
        students: &[],
        anonymize,
    })
    .expect("analysis succeeds")
}

#[test]
fn analysis_reports_persistence_and_recommendations() {
    let options = AnalysisOptions::default().with_exam_order(["E1", "E2"]);
    let report = analyze(&scenario_table(), &options, false);

    assert!(report.validation.passed());
    assert!(report.mapping_used.is_none());
    assert_eq!(report.overall.rows, 6);
    assert_eq!(report.coverage.unmapped, 0);

    let loops = report
        .concept_persistence
        .iter()
        .find(|r| r.key == "Loops")
        .expect("loops persistence");
    assert_eq!(loops.cohort_size, 2);
    assert_eq!(loops.persistence_rate, 0.5);

    assert_eq!(report.recommendations.len(), 2);
    assert!(report
        .recommendations
        .iter()
        .all(|rec| rec.action == Action::ReTeach));

    assert_eq!(report.sections[0].group, "Unassigned Section");
    assert_eq!(report.exam_changes[1].delta_vs_prev, Some(2.0));
    assert!(report.lesson_plan[0].contains("Loops"));
}

#[test]
fn anonymize_relabels_students() {
    let report = analyze(&scenario_table(), &AnalysisOptions::default(), true);
    let students: Vec<&str> = report
        .student_summary
        .iter()
        .map(|s| s.student_id.as_str())
        .collect();
    assert!(students.iter().all(|id| id.starts_with("Student 00")));
}

#[test]
fn inline_pairs_map_a_custom_export() {
    let table = RawTable::from_rows(
        &["Learner", "Assessment", "Prompt No", "Comment", "Deducted"],
        [
            ["s1", "Midterm", "1", "Sign error", "2"],
            ["s2", "Midterm", "1", "Sign error", "1"],
        ],
    );
    let pairs: Vec<String> = [
        "student_id=Learner",
        "exam_id=Assessment",
        "question_id=Prompt No",
        "rubric_item=Comment",
        "points_lost=Deducted",
    ]
    .map(String::from)
    .to_vec();

    let dir = TempDir::new().expect("temp dir");
    let hint = MappingHintStore::new(dir.path().join("hint.json"));
    let mapping = resolve_mapping(None, &pairs, Some(&hint), &table)
        .expect("valid pairs")
        .expect("mapping");
    hint.save(&mapping).expect("save hint");

    let reused = resolve_mapping(None, &[], Some(&hint), &table)
        .expect("load hint")
        .expect("hint applies");
    assert_eq!(reused, mapping);

    let concepts = ConceptMapping::new();
    let options = AnalysisOptions::default();
    let report = run_analysis(&AnalysisInput {
        table: &table,
        mapping: Some(&mapping),
        infer: false,
        concepts: &concepts,
        options: &options,
        students: &["s2".to_string()],
        anonymize: false,
    })
    .expect("analysis succeeds");

    assert_eq!(report.table.len(), 1);
    assert_eq!(report.coverage.unmapped, 1);
    assert_eq!(report.unmapped_items, ["Sign error"]);
    assert!(report.recommendations.is_empty());
}

#[test]
fn missing_required_pair_is_rejected() {
    let table = scenario_table();
    let pairs = vec!["student_id=student_id".to_string()];
    let error = resolve_mapping(None, &pairs, None, &table).unwrap_err();
    assert!(format!("{error:#}").contains("exam_id"));
}

#[test]
fn exports_write_every_section() {
    let options = AnalysisOptions::default().with_exam_order(["E1", "E2"]);
    let report = analyze(&scenario_table(), &options, false);
    let dir = TempDir::new().expect("temp dir");

    let summary = write_exports(&report, dir.path()).expect("exports written");

    assert_eq!(summary.files.len(), 16);
    assert!(summary.files.iter().all(|path| path.starts_with(dir.path())));
    let recommendations =
        fs::read_to_string(dir.path().join("recommendations.csv")).expect("read recommendations");
    insta::assert_snapshot!(recommendations, @r"
    concept,action,impact_score,students,points_lost_total,persistence_rate
    Loops,Re-teach,7.0,2,3.5,0.5
    Recursion,Re-teach,7.0,2,3.5,1.0
    ");
}

#[test]
fn validate_outcome_follows_normalized_checks() {
    let raw = RawTable::from_rows(
        &["SID", "Exam", "Question", "Rubric", "Points"],
        [["s1", "E1", "Q1", "Sign error", "2"]],
    );
    let normalized = rubric_map::normalize_table(&raw, None, true).expect("inferred mapping");
    let outcome = ValidateOutcome {
        raw: validate(&raw),
        normalized: Some(validate_canonical(&normalized.table)),
        normalize_error: None,
    };
    assert!(!outcome.raw.passed());
    assert!(outcome.passed());

    let failed = ValidateOutcome {
        raw: validate(&raw),
        normalized: None,
        normalize_error: Some("mapping required".to_string()),
    };
    assert!(!failed.passed());
}
