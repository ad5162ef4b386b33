//! The eight-field canonical row shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Canonical column names in output order.
pub const CANONICAL_COLUMNS: [&str; 8] = [
    "student_id",
    "exam_id",
    "question_id",
    "rubric_item",
    "points_lost",
    "topic",
    "section_id",
    "ta_id",
];

/// Columns that must be present (and populated) in every canonical table.
pub const REQUIRED_CANONICAL: [&str; 5] = [
    "student_id",
    "exam_id",
    "question_id",
    "rubric_item",
    "points_lost",
];

/// A field of the canonical schema.
///
/// Variant order matches [`CANONICAL_COLUMNS`], so ordered collections keyed
/// by `CanonicalField` iterate in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    StudentId,
    ExamId,
    QuestionId,
    RubricItem,
    PointsLost,
    Topic,
    SectionId,
    TaId,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        Self::StudentId,
        Self::ExamId,
        Self::QuestionId,
        Self::RubricItem,
        Self::PointsLost,
        Self::Topic,
        Self::SectionId,
        Self::TaId,
    ];

    pub const REQUIRED: [CanonicalField; 5] = [
        Self::StudentId,
        Self::ExamId,
        Self::QuestionId,
        Self::RubricItem,
        Self::PointsLost,
    ];

    pub const OPTIONAL: [CanonicalField; 3] = [Self::Topic, Self::SectionId, Self::TaId];

    /// Required string fields that must be non-blank on every row.
    pub const IDENTIFIERS: [CanonicalField; 4] = [
        Self::StudentId,
        Self::ExamId,
        Self::QuestionId,
        Self::RubricItem,
    ];

    /// Canonical column name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StudentId => "student_id",
            Self::ExamId => "exam_id",
            Self::QuestionId => "question_id",
            Self::RubricItem => "rubric_item",
            Self::PointsLost => "points_lost",
            Self::Topic => "topic",
            Self::SectionId => "section_id",
            Self::TaId => "ta_id",
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(self, Self::Topic | Self::SectionId | Self::TaId)
    }

    /// Parse a canonical column name (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let needle = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|field| field.as_str() == needle)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SchemaError::UnknownField {
            name: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_follow_column_order() {
        let names: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, CANONICAL_COLUMNS);
        let required: Vec<&str> = CanonicalField::REQUIRED
            .iter()
            .map(|f| f.as_str())
            .collect();
        assert_eq!(required, REQUIRED_CANONICAL);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(CanonicalField::parse(" TA_ID "), Some(CanonicalField::TaId));
        assert_eq!("points_lost".parse(), Ok(CanonicalField::PointsLost));
        assert!("grade".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn optional_fields_are_not_required() {
        for field in CanonicalField::OPTIONAL {
            assert!(!field.is_required());
        }
        for field in CanonicalField::REQUIRED {
            assert!(field.is_required());
        }
    }
}
