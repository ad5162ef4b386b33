use std::collections::{BTreeMap, BTreeSet};

use rubric_model::{CanonicalRow, CanonicalTable, RowError};

/// Keeps only rows whose student is in `student_ids`. An empty list keeps everything.
pub fn filter_students(table: &CanonicalTable, student_ids: &[String]) -> CanonicalTable {
    if student_ids.is_empty() {
        return table.clone();
    }
    let keep: BTreeSet<&str> = student_ids.iter().map(|id| id.trim()).collect();
    table
        .iter()
        .filter(|row| keep.contains(row.student_id()))
        .cloned()
        .collect()
}

/// Replaces student identifiers with `Student 001`, `Student 002`, ...
///
/// Labels are assigned in sorted order of the original identifiers.
pub fn anonymize_students(table: &CanonicalTable) -> Result<CanonicalTable, RowError> {
    let distinct: BTreeSet<&str> = table.iter().map(CanonicalRow::student_id).collect();
    let labels: BTreeMap<&str, String> = distinct
        .into_iter()
        .enumerate()
        .map(|(index, id)| (id, format!("Student {:03}", index + 1)))
        .collect();

    let rows = table
        .iter()
        .map(|row| match labels.get(row.student_id()) {
            Some(label) => row.relabel_student(label),
            None => Ok(row.clone()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CanonicalTable::new(rows))
}
