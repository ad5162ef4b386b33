use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rubric_concepts::{ConceptMapping, WorklistEntry};
use rubric_map::needs_mapping;
use rubric_metrics::{GroupStats, PersistenceRecord, disparity};
use rubric_model::{CanonicalField, MappingSelection, RawTable};
use rubric_recommend::Action;
use rubric_validate::ValidationReport;

use rubric_cli::types::{AnalysisReport, ExportSummary, ValidateOutcome};

/// Rows shown per ranked table.
const LIST_LIMIT: usize = 10;

pub fn print_suggestion(table: &RawTable, suggestion: &MappingSelection) {
    println!("Columns: {}", table.headers.join(", "));
    println!(
        "Canonical: {}",
        if needs_mapping(table) { "no, mapping needed" } else { "yes" }
    );
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Field"),
        header_cell("Required"),
        header_cell("Suggested column"),
    ]);
    apply_table_style(&mut out);
    for field in CanonicalField::ALL {
        let column = suggestion.get(&field).cloned().flatten();
        out.add_row(vec![
            Cell::new(field.as_str()),
            if field.is_required() {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                dim_cell("no")
            },
            match column {
                Some(column) => Cell::new(column).fg(Color::Green),
                None if field.is_required() => Cell::new("unmapped").fg(Color::Red),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{out}");
}

fn print_report(label: &str, report: &ValidationReport) {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Check"),
        header_cell("Status"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut out);
    for result in &report.results {
        out.add_row(vec![
            Cell::new(result.name.as_str()),
            status_cell(result.ok),
            Cell::new(result.detail.to_string()),
        ]);
    }
    println!("{label}:");
    println!("{out}");
}

pub fn print_validation(outcome: &ValidateOutcome) {
    print_report("Raw table", &outcome.raw);
    match (&outcome.normalized, &outcome.normalize_error) {
        (Some(report), _) => print_report("Normalized table", report),
        (None, Some(error)) => eprintln!("Normalization failed: {error}"),
        (None, None) => {}
    }
}

pub fn print_analysis(report: &AnalysisReport) {
    let overall = &report.overall;
    println!(
        "Rows: {}  Students: {}  Exams: {}  Questions: {}  Avg points lost: {}",
        overall.rows,
        overall.students,
        overall.exams,
        overall.questions,
        overall
            .avg_points_lost
            .map_or_else(|| "-".to_string(), |avg| format!("{avg:.2}"))
    );
    println!("Exam order: {}", report.exam_order.join(" -> "));
    println!(
        "Concepts: {} rows mapped, {} unmapped ({} rubric items need a concept)",
        report.coverage.mapped,
        report.coverage.unmapped,
        report.unmapped_items.len()
    );
    if !report.validation.passed() {
        for failure in report.validation.failures() {
            eprintln!("warning: {} failed ({})", failure.name, failure.detail);
        }
    }

    print_recommendations(report);
    print_persistence("Persistent rubric items", &report.rubric_persistence);
    print_persistence("Persistent concepts", &report.concept_persistence);
    print_exam_changes(report);
    print_groups("Section", &report.sections);
    print_groups("TA", &report.tas);
    print_clusters(report);

    if !report.lesson_plan.is_empty() {
        println!();
        println!("Lesson plan:");
        for suggestion in &report.lesson_plan {
            println!("- {suggestion}");
        }
    }
}

fn print_recommendations(report: &AnalysisReport) {
    println!();
    if report.recommendations.is_empty() {
        println!("Recommendations: none (add topics or concept mappings)");
        return;
    }
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Action"),
        header_cell("Concept"),
        header_cell("Impact"),
        header_cell("Students"),
        header_cell("Points lost"),
        header_cell("Persistence"),
    ]);
    apply_summary_table_style(&mut out);
    for column in 2..6 {
        align_column(&mut out, column, CellAlignment::Right);
    }
    for rec in &report.recommendations {
        let action = match rec.action {
            Action::ReTeach => Cell::new(rec.action).fg(Color::Red).add_attribute(Attribute::Bold),
            Action::AddPractice => Cell::new(rec.action).fg(Color::Yellow),
        };
        out.add_row(vec![
            action,
            Cell::new(&rec.concept).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", rec.impact_score)),
            Cell::new(rec.students),
            Cell::new(format!("{:.1}", rec.points_lost_total)),
            percent_cell(rec.persistence_rate),
        ]);
    }
    println!("Recommendations:");
    println!("{out}");
}

fn print_persistence(label: &str, records: &[PersistenceRecord]) {
    println!();
    if records.is_empty() {
        println!("{label}: need at least two exams");
        return;
    }
    let ranked = rubric_metrics::top_persistent(records, LIST_LIMIT);
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Key"),
        header_cell("Cohort"),
        header_cell("Repeated"),
        header_cell("Rate"),
    ]);
    apply_table_style(&mut out);
    for column in 1..4 {
        align_column(&mut out, column, CellAlignment::Right);
    }
    for record in &ranked {
        out.add_row(vec![
            Cell::new(&record.key),
            Cell::new(record.cohort_size),
            Cell::new(record.repeated),
            percent_cell(record.persistence_rate),
        ]);
    }
    println!("{label}:");
    println!("{out}");
}

fn print_exam_changes(report: &AnalysisReport) {
    if report.exam_changes.is_empty() {
        return;
    }
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Exam"),
        header_cell("Points lost"),
        header_cell("Change"),
        header_cell("Change %"),
    ]);
    apply_table_style(&mut out);
    for column in 1..4 {
        align_column(&mut out, column, CellAlignment::Right);
    }
    for change in &report.exam_changes {
        out.add_row(vec![
            Cell::new(&change.exam_id),
            Cell::new(format!("{:.1}", change.total_points_lost)),
            match change.delta_vs_prev {
                Some(delta) => signed_cell(delta, format!("{delta:+.1}")),
                None => dim_cell("-"),
            },
            match change.pct_change_vs_prev {
                Some(pct) => signed_cell(pct, format!("{:+.1}%", pct * 100.0)),
                None => dim_cell("-"),
            },
        ]);
    }
    println!();
    println!("Exam-over-exam changes:");
    println!("{out}");
}

fn print_groups(label: &str, groups: &[GroupStats]) {
    // a single group has nothing to compare against
    if groups.len() < 2 {
        return;
    }
    let mut out = Table::new();
    out.set_header(vec![
        header_cell(label),
        header_cell("Rows"),
        header_cell("Students"),
        header_cell("Points lost"),
        header_cell("Per student"),
        header_cell("Per row"),
    ]);
    apply_table_style(&mut out);
    for column in 1..6 {
        align_column(&mut out, column, CellAlignment::Right);
    }
    for group in groups {
        out.add_row(vec![
            Cell::new(&group.group),
            Cell::new(group.rows),
            Cell::new(group.students),
            Cell::new(format!("{:.1}", group.total_points_lost)),
            Cell::new(format!("{:.2}", group.avg_points_per_student)),
            Cell::new(format!("{:.2}", group.avg_points_per_row)),
        ]);
    }
    println!();
    println!("{label} comparison:");
    println!("{out}");
    if let Some(spread) = disparity(groups) {
        println!("Spread in points lost per student: {spread:.2}");
    }
}

fn print_clusters(report: &AnalysisReport) {
    let clusters: Vec<_> = report.clusters.multi_item().collect();
    println!();
    if clusters.is_empty() {
        println!("Misconception clusters: none found");
        return;
    }
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Cluster"),
        header_cell("Rubric items"),
        header_cell("Size"),
        header_cell("Students"),
    ]);
    apply_summary_table_style(&mut out);
    align_column(&mut out, 2, CellAlignment::Right);
    align_column(&mut out, 3, CellAlignment::Right);
    for cluster in clusters.iter().take(LIST_LIMIT) {
        out.add_row(vec![
            Cell::new(&cluster.label).fg(Color::Blue),
            Cell::new(cluster.members.join("\n")),
            Cell::new(cluster.size),
            Cell::new(cluster.support_students),
        ]);
    }
    println!("Misconception clusters:");
    println!("{out}");
}

pub fn print_exports(summary: &ExportSummary) {
    println!();
    println!(
        "Exported {} files to {}",
        summary.files.len(),
        summary.output_dir.display()
    );
}

pub fn print_concepts(mapping: &ConceptMapping) {
    if mapping.is_empty() {
        println!("No concept mappings saved.");
        return;
    }
    let mut out = Table::new();
    out.set_header(vec![header_cell("Rubric item"), header_cell("Concept")]);
    apply_table_style(&mut out);
    for (item, concept) in mapping.entries() {
        out.add_row(vec![Cell::new(item), Cell::new(concept)]);
    }
    println!("{out}");
}

pub fn print_worklist(entries: &[WorklistEntry]) {
    if entries.is_empty() {
        println!("Every rubric item has a concept.");
        return;
    }
    let mut out = Table::new();
    out.set_header(vec![header_cell("Rubric item"), header_cell("Concept")]);
    apply_table_style(&mut out);
    for entry in entries {
        out.add_row(vec![
            Cell::new(&entry.rubric_item),
            match &entry.concept {
                Some(concept) => Cell::new(concept),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{out}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(ok: bool) -> Cell {
    if ok {
        Cell::new("PASS").fg(Color::Green)
    } else {
        Cell::new("FAIL").fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn percent_cell(rate: f64) -> Cell {
    let cell = Cell::new(format!("{:.0}%", rate * 100.0));
    if rate >= 0.5 {
        cell.fg(Color::Red)
    } else if rate > 0.0 {
        cell.fg(Color::Yellow)
    } else {
        cell
    }
}

/// More points lost is worse, so increases are red.
fn signed_cell(value: f64, text: String) -> Cell {
    if value > 0.0 {
        Cell::new(text).fg(Color::Red)
    } else if value < 0.0 {
        Cell::new(text).fg(Color::Green)
    } else {
        Cell::new(text)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
