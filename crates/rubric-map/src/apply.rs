use std::collections::BTreeMap;

use rubric_model::{CanonicalTable, MappingConfig, MappingError, RawTable};

use crate::canonical::coerce_rows;

/// Projects `table` through `mapping` into a canonical table.
///
/// Fails if any declared source column is absent, if a required value is
/// blank, or if `points_lost` is non-numeric or negative on any row.
pub fn apply_mapping(
    table: &RawTable,
    mapping: &MappingConfig,
) -> Result<CanonicalTable, MappingError> {
    let missing = mapping.missing_columns(table);
    if !missing.is_empty() {
        return Err(MappingError::SourceColumnsMissing { columns: missing });
    }

    let mut columns = BTreeMap::new();
    for (field, source) in mapping.sources() {
        if let Some(idx) = table.column_index(source) {
            columns.insert(*field, idx);
        }
    }
    let canonical = coerce_rows(table, &columns)?;
    tracing::info!(
        rows = canonical.len(),
        mapped_fields = columns.len(),
        "Applied column mapping"
    );
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use rubric_model::{CanonicalField, MappingSelection};

    use super::*;

    fn mapping(pairs: &[(CanonicalField, &str)]) -> MappingConfig {
        let selection: MappingSelection = pairs
            .iter()
            .map(|(field, column)| (*field, Some((*column).to_string())))
            .collect();
        MappingConfig::from_selection(&selection).unwrap()
    }

    fn gradebook_mapping() -> MappingConfig {
        mapping(&[
            (CanonicalField::StudentId, "SID"),
            (CanonicalField::ExamId, "Exam"),
            (CanonicalField::QuestionId, "Question"),
            (CanonicalField::RubricItem, "Rubric"),
            (CanonicalField::PointsLost, "Deduction"),
            (CanonicalField::SectionId, "Section"),
        ])
    }

    #[test]
    fn maps_and_coerces_source_columns() {
        let table = RawTable::from_rows(
            &["SID", "Exam", "Question", "Rubric", "Deduction", "Section", "Extra"],
            [["  s1", "Midterm 1", "Q3", "No  units", "2", " 101 ", "ignored"]],
        );
        let canonical = apply_mapping(&table, &gradebook_mapping()).unwrap();
        let row = &canonical.rows()[0];

        assert_eq!(row.student_id(), "s1");
        assert_eq!(row.rubric_item(), "No units");
        assert_eq!(row.section_id(), "101");
        assert_eq!(row.topic(), "");
        assert_eq!(row.ta_id(), "");
    }

    #[test]
    fn missing_source_column_is_an_error() {
        let table = RawTable::from_rows(&["SID", "Exam"], [["s1", "E1"]]);
        let err = apply_mapping(&table, &gradebook_mapping()).unwrap_err();

        assert_eq!(
            err,
            MappingError::SourceColumnsMissing {
                columns: vec![
                    "Question".to_string(),
                    "Rubric".to_string(),
                    "Deduction".to_string(),
                    "Section".to_string(),
                ]
            }
        );
    }
}
