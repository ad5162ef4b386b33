//! Canonical CSV persistence and record export.

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use rubric_map::ensure_canonical_columns;
use rubric_model::CanonicalTable;
use serde::Serialize;

use crate::error::{IngestError, Result};
use crate::reader::read_csv_table;

/// Writes a canonical table with the full canonical header.
pub fn write_canonical_csv(path: &Path, table: &CanonicalTable) -> Result<()> {
    let raw = table.to_raw();
    let mut writer = open_writer(path)?;
    writer
        .write_record(&raw.headers)
        .map_err(|e| write_error(path, e))?;
    for row in &raw.rows {
        writer.write_record(row).map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), rows = table.len(), "Wrote canonical CSV");
    Ok(())
}

/// Reads a canonical CSV and re-validates every row.
pub fn read_canonical_csv(path: &Path) -> Result<CanonicalTable> {
    let raw = read_csv_table(path)?;
    ensure_canonical_columns(&raw).map_err(|source| IngestError::Canonical {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes records as CSV to a file. Headers come from the record fields.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = open_writer(path)?;
    for record in records {
        writer.serialize(record).map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), records = records.len(), "Wrote records");
    Ok(())
}

/// Serializes records as CSV into any writer.
pub fn write_records_to<W: Write, T: Serialize>(sink: W, records: &[T]) -> Result<()> {
    let label = Path::new("<output>");
    let mut writer = WriterBuilder::new().from_writer(sink);
    for record in records {
        writer.serialize(record).map_err(|e| write_error(label, e))?;
    }
    writer.flush().map_err(|e| IngestError::FileWrite {
        path: label.to_path_buf(),
        source: e,
    })
}

fn open_writer(path: &Path) -> Result<Writer<fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    WriterBuilder::new()
        .from_path(path)
        .map_err(|e| write_error(path, e))
}

fn write_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::CsvWrite {
        path: path.to_path_buf(),
        source,
    }
}
