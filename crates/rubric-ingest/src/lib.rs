//! Rubric export ingestion.
//!
//! - **CSV Loading**: read any delimited export into a [`RawTable`](rubric_model::RawTable)
//! - **Frame Bridge**: convert a Polars `DataFrame` into a `RawTable`
//! - **Canonical CSV**: write and re-validate canonical tables
//! - **Exports**: serialize records and build safe export paths

mod error;
mod export;
mod frame;
mod reader;
mod writer;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{normalize_header, read_csv_reader, read_csv_table};

// === Frame Bridge ===
pub use frame::{any_to_string, table_from_frame};

// === Writers ===
pub use writer::{read_canonical_csv, write_canonical_csv, write_records, write_records_to};

// === Export Paths ===
pub use export::{build_export_path, sanitize_filename};
