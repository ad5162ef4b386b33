//! CSV reading into raw string tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rubric_model::{RawTable, collapse_whitespace};

use crate::error::{IngestError, Result};

/// Label used in errors for tables read from a stream.
const STREAM_LABEL: &str = "<input>";

/// Normalizes a header cell: strips a BOM and collapses whitespace.
pub fn normalize_header(value: &str) -> String {
    collapse_whitespace(value.trim_matches('\u{feff}'))
}

/// Reads a CSV file into a [`RawTable`].
///
/// Cells are kept verbatim as strings; literal tokens such as `None` or `NA`
/// are not converted to empty values. Short rows are padded.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let table = read_table(file, path)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers.len(),
        "Read CSV table"
    );
    Ok(table)
}

/// Reads CSV data from any reader into a [`RawTable`].
pub fn read_csv_reader<R: Read>(reader: R) -> Result<RawTable> {
    read_table(reader, Path::new(STREAM_LABEL))
}

fn read_table<R: Read>(reader: R, path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(normalize_header)
        .collect::<Vec<_>>();

    if headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let mut table = RawTable::new(headers);
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        table.push_row(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_table_headers_normalized() {
        let file = create_temp_csv("\u{feff}Student  ID, Exam ,Points\ns1,E1,2\n");
        let table = read_csv_table(file.path()).unwrap();

        assert_eq!(table.headers, vec!["Student ID", "Exam", "Points"]);
        assert_eq!(table.rows, vec![vec!["s1", "E1", "2"]]);
    }

    #[test]
    fn test_read_csv_table_pads_short_rows() {
        let file = create_temp_csv("a,b,c\n1,2\n4,5,6\n");
        let table = read_csv_table(file.path()).unwrap();

        assert_eq!(table.rows[0], vec!["1", "2", ""]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_read_csv_table_keeps_literal_tokens() {
        let file = create_temp_csv("topic,x\nNone,NA\n,\n");
        let table = read_csv_table(file.path()).unwrap();

        assert_eq!(table.rows, vec![vec!["None", "NA"]]);
    }

    #[test]
    fn test_read_csv_table_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_table(file.path());

        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_table_missing_file() {
        let result = read_csv_table(Path::new("/nonexistent/deductions.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_csv_reader() {
        let table = read_csv_reader("a,b\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.cell(0, 1), "2");
    }
}
