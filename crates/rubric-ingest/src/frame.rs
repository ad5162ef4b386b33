//! Polars `DataFrame` bridge.

use polars::prelude::*;
use rubric_model::{RawTable, format_numeric};

use crate::error::Result;
use crate::reader::normalize_header;

/// Converts an `AnyValue` to a cell string.
///
/// Nulls become empty cells and floats lose trailing zeros, so `2.0`
/// renders as `2`.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Converts a `DataFrame` into a [`RawTable`] of string cells.
pub fn table_from_frame(df: &DataFrame) -> Result<RawTable> {
    let headers = df
        .get_column_names()
        .iter()
        .map(|name| normalize_header(name.as_str()))
        .collect();
    let mut table = RawTable::new(headers);
    let columns = df.get_columns();
    for idx in 0..df.height() {
        let mut row = Vec::with_capacity(columns.len());
        for column in columns {
            row.push(any_to_string(column.get(idx)?));
        }
        table.push_row(row);
    }
    tracing::debug!(
        rows = table.len(),
        columns = table.headers.len(),
        "Converted DataFrame to raw table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_frame() {
        let df = df! {
            "Student" => &["s1", "s2"],
            "Points" => &[2.0, 1.5],
            "Topic" => &[Some("Limits"), None],
        }
        .unwrap();

        let table = table_from_frame(&df).unwrap();

        assert_eq!(table.headers, vec!["Student", "Points", "Topic"]);
        assert_eq!(table.rows[0], vec!["s1", "2", "Limits"]);
        assert_eq!(table.rows[1], vec!["s2", "1.5", ""]);
    }

    #[test]
    fn test_any_to_string_integers_and_bools() {
        assert_eq!(any_to_string(AnyValue::Int64(40)), "40");
        assert_eq!(any_to_string(AnyValue::Boolean(true)), "true");
        assert_eq!(any_to_string(AnyValue::Null), "");
    }
}
