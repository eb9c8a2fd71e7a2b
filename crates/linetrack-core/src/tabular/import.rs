//! Spreadsheet import
//!
//! The format is chosen by file extension. CSV is always readable; Excel and
//! OpenDocument workbooks need the `spreadsheets` feature.

use std::path::Path;

use tracing::debug;

use super::{Table, TabularError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse the first sheet of an uploaded file into a [`Table`]
pub fn parse_table(file_name: &str, bytes: &[u8]) -> Result<Table, TabularError> {
    if bytes.is_empty() {
        return Err(TabularError::Empty);
    }
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let table = match extension.as_str() {
        "csv" => parse_csv(bytes)?,
        #[cfg(feature = "spreadsheets")]
        "xlsx" | "xlsm" | "xls" | "ods" => parse_workbook(bytes)?,
        _ => return Err(TabularError::UnsupportedFormat(file_name.to_string())),
    };

    debug!(file = file_name, rows = table.len(), "Parsed upload");
    Ok(table)
}

fn parse_csv(bytes: &[u8]) -> Result<Table, TabularError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let records = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Table::from_records(headers, records))
}

#[cfg(feature = "spreadsheets")]
fn parse_workbook(bytes: &[u8]) -> Result<Table, TabularError> {
    use calamine::Reader;

    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| TabularError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TabularError::Workbook("workbook has no sheets".to_string()))?
        .map_err(|e| TabularError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| cell.to_string()).collect(),
        None => return Ok(Table::default()),
    };
    let records: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    Ok(Table::from_records(headers, records))
}
