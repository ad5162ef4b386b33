use rubric_model::{CanonicalField, MappingSelection, REQUIRED_CANONICAL, RawTable};

/// Header keywords per canonical field.
///
/// A column matches a field when its lowercased header contains any of the
/// keywords. Keywords are alternatives, not a priority list.
pub const FIELD_KEYWORDS: [(CanonicalField, &[&str]); 8] = [
    (CanonicalField::StudentId, &["student id", "id", "sid", "uid"]),
    (CanonicalField::ExamId, &["exam", "assessment", "assignment", "test"]),
    (CanonicalField::QuestionId, &["question", "item", "q", "problem"]),
    (
        CanonicalField::RubricItem,
        &["rubric", "criterion", "prompt", "issue", "deduction"],
    ),
    (
        CanonicalField::PointsLost,
        &["points_lost", "points lost", "deduction", "penalty", "loss", "points"],
    ),
    (CanonicalField::Topic, &["topic", "tag", "category"]),
    (CanonicalField::SectionId, &["section", "discussion", "lecture"]),
    (CanonicalField::TaId, &["ta", "grader", "assistant", "gsi"]),
];

/// Guesses a source column for every canonical field.
///
/// Fields are resolved independently in canonical order; for each one the
/// first column (in table order) matching any keyword wins. Two fields may
/// therefore receive the same column.
pub fn suggest_mapping(table: &RawTable) -> MappingSelection {
    let lowered: Vec<String> = table.headers.iter().map(|h| h.to_lowercase()).collect();
    FIELD_KEYWORDS
        .iter()
        .map(|(field, keywords)| {
            let column = lowered
                .iter()
                .position(|header| keywords.iter().any(|kw| header.contains(kw)))
                .map(|idx| table.headers[idx].clone());
            (*field, column)
        })
        .collect()
}

/// True unless every required canonical column already exists verbatim.
pub fn needs_mapping(table: &RawTable) -> bool {
    !REQUIRED_CANONICAL
        .iter()
        .all(|column| table.has_column(column))
}
