//! Typed canonical rows.

use serde::Serialize;

use crate::error::RowError;
use crate::schema::CanonicalField;
use crate::text::{collapse_whitespace, format_numeric};

/// One deduction event.
///
/// Constructed only through [`CanonicalRow::new`], which trims identifiers,
/// collapses whitespace in `rubric_item` and rejects blank identifiers and
/// negative or non-finite `points_lost`. Serializes in canonical column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    student_id: String,
    exam_id: String,
    question_id: String,
    rubric_item: String,
    points_lost: f64,
    topic: String,
    section_id: String,
    ta_id: String,
}

impl CanonicalRow {
    pub fn new(
        student_id: &str,
        exam_id: &str,
        question_id: &str,
        rubric_item: &str,
        points_lost: f64,
    ) -> Result<Self, RowError> {
        let student_id = required(student_id.trim(), CanonicalField::StudentId)?;
        let exam_id = required(exam_id.trim(), CanonicalField::ExamId)?;
        let question_id = required(question_id.trim(), CanonicalField::QuestionId)?;
        let rubric_item = required(&collapse_whitespace(rubric_item), CanonicalField::RubricItem)?;
        if !points_lost.is_finite() {
            return Err(RowError::NonFinitePoints);
        }
        if points_lost < 0.0 {
            return Err(RowError::NegativePoints { value: points_lost });
        }
        Ok(Self {
            student_id,
            exam_id,
            question_id,
            rubric_item,
            // normalizes -0.0
            points_lost: points_lost + 0.0,
            topic: String::new(),
            section_id: String::new(),
            ta_id: String::new(),
        })
    }

    #[must_use]
    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = topic.trim().to_string();
        self
    }

    #[must_use]
    pub fn with_section_id(mut self, section_id: &str) -> Self {
        self.section_id = section_id.trim().to_string();
        self
    }

    #[must_use]
    pub fn with_ta_id(mut self, ta_id: &str) -> Self {
        self.ta_id = ta_id.trim().to_string();
        self
    }

    /// Returns a copy with a different student identifier.
    pub fn relabel_student(&self, student_id: &str) -> Result<Self, RowError> {
        let student_id = required(student_id.trim(), CanonicalField::StudentId)?;
        Ok(Self {
            student_id,
            ..self.clone()
        })
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn exam_id(&self) -> &str {
        &self.exam_id
    }

    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    pub fn rubric_item(&self) -> &str {
        &self.rubric_item
    }

    pub fn points_lost(&self) -> f64 {
        self.points_lost
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn ta_id(&self) -> &str {
        &self.ta_id
    }

    /// Cell text for a canonical field, as written to canonical CSV.
    pub fn value(&self, field: CanonicalField) -> String {
        match field {
            CanonicalField::StudentId => self.student_id.clone(),
            CanonicalField::ExamId => self.exam_id.clone(),
            CanonicalField::QuestionId => self.question_id.clone(),
            CanonicalField::RubricItem => self.rubric_item.clone(),
            CanonicalField::PointsLost => format_numeric(self.points_lost),
            CanonicalField::Topic => self.topic.clone(),
            CanonicalField::SectionId => self.section_id.clone(),
            CanonicalField::TaId => self.ta_id.clone(),
        }
    }
}

impl AsRef<CanonicalRow> for CanonicalRow {
    fn as_ref(&self) -> &CanonicalRow {
        self
    }
}

fn required(value: &str, field: CanonicalField) -> Result<String, RowError> {
    if value.is_empty() {
        Err(RowError::BlankField { field })
    } else {
        Ok(value.to_string())
    }
}

/// A canonical row with its resolved concept label.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    row: CanonicalRow,
    concept: String,
}

impl ResolvedRow {
    pub fn new(row: CanonicalRow, concept: impl Into<String>) -> Self {
        Self {
            row,
            concept: concept.into(),
        }
    }

    pub fn row(&self) -> &CanonicalRow {
        &self.row
    }

    pub fn concept(&self) -> &str {
        &self.concept
    }

    pub fn into_parts(self) -> (CanonicalRow, String) {
        (self.row, self.concept)
    }
}

impl AsRef<CanonicalRow> for ResolvedRow {
    fn as_ref(&self) -> &CanonicalRow {
        &self.row
    }
}
