//! Tabular Module
//!
//! Spreadsheet import for plan and stock uploads, and CSV export of the
//! submission log.

mod export;
mod import;

use std::collections::BTreeMap;

use serde::Serialize;

pub use export::{export_columns, export_row, write_csv, ExportRow, EXPORT_SCHEMA_VERSION};
pub use import::parse_table;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Spreadsheet import/export error
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TabularError {
    /// File extension we cannot read
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// The upload carried no bytes
    #[error("Empty file")]
    Empty,
    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Workbook could not be opened or has no sheets
    #[error("Spreadsheet error: {0}")]
    Workbook(String),
    /// A column the upload must contain is absent
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    /// A cell that must be numeric is not
    #[error("Invalid number in column {column} (row {row}): {value:?}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// TABLE
// ============================================================================

/// One data row: trimmed header -> trimmed cell text
pub type Row = BTreeMap<String, String>;

/// Rows read from the first sheet of an upload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Header names in sheet order
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Build from a header line and raw rows, skipping fully blank rows
    pub fn from_records<I, R>(headers: Vec<String>, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = String>,
    {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let rows = records
            .into_iter()
            .map(|record| {
                headers
                    .iter()
                    .cloned()
                    .zip(record.into_iter().map(|cell| cell.trim().to_string()))
                    .filter(|(header, _)| !header.is_empty())
                    .collect::<Row>()
            })
            .filter(|row| row.values().any(|v| !v.is_empty()))
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Fail with the first column in `names` that is missing
    pub fn require_columns(&self, names: &[&str]) -> Result<(), TabularError> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(TabularError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }
}
