use std::collections::BTreeMap;

use rubric_model::{
    CanonicalField, CanonicalRow, CanonicalTable, MappingError, REQUIRED_CANONICAL, RawTable,
    parse_points,
};

/// Validates a table whose headers are already canonical.
///
/// Applies the same trimming, defaulting and coercion as
/// [`apply_mapping`](crate::apply_mapping). Extra columns are ignored and
/// absent optional columns default to empty strings.
pub fn ensure_canonical_columns(table: &RawTable) -> Result<CanonicalTable, MappingError> {
    let missing: Vec<String> = REQUIRED_CANONICAL
        .iter()
        .filter(|column| !table.has_column(column))
        .map(|column| (*column).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(MappingError::MissingRequiredColumns { columns: missing });
    }

    let columns: BTreeMap<CanonicalField, usize> = CanonicalField::ALL
        .iter()
        .filter_map(|field| Some((*field, table.column_index(field.as_str())?)))
        .collect();
    coerce_rows(table, &columns)
}

/// Builds canonical rows from the given field-to-column positions.
///
/// Rejects the whole table on the first violating row. Row numbers in errors
/// are 1-based.
pub(crate) fn coerce_rows(
    table: &RawTable,
    columns: &BTreeMap<CanonicalField, usize>,
) -> Result<CanonicalTable, MappingError> {
    let mut rows = Vec::with_capacity(table.len());
    for idx in 0..table.len() {
        let row_number = idx + 1;
        let cell = |field: CanonicalField| {
            columns
                .get(&field)
                .map_or("", |&col| table.cell(idx, col))
        };

        for field in CanonicalField::IDENTIFIERS {
            if cell(field).trim().is_empty() {
                return Err(MappingError::BlankRequiredValue {
                    field,
                    row: row_number,
                });
            }
        }

        let raw_points = cell(CanonicalField::PointsLost);
        if raw_points.trim().is_empty() {
            return Err(MappingError::BlankRequiredValue {
                field: CanonicalField::PointsLost,
                row: row_number,
            });
        }
        let points = parse_points(raw_points).ok_or_else(|| MappingError::NonNumericPoints {
            row: row_number,
            value: raw_points.trim().to_string(),
        })?;

        let row = CanonicalRow::new(
            cell(CanonicalField::StudentId),
            cell(CanonicalField::ExamId),
            cell(CanonicalField::QuestionId),
            cell(CanonicalField::RubricItem),
            points,
        )
        .map_err(|e| MappingError::from_row(e, row_number, raw_points))?
        .with_topic(cell(CanonicalField::Topic))
        .with_section_id(cell(CanonicalField::SectionId))
        .with_ta_id(cell(CanonicalField::TaId));
        rows.push(row);
    }
    tracing::debug!(rows = rows.len(), "Coerced canonical rows");
    Ok(CanonicalTable::new(rows))
}
