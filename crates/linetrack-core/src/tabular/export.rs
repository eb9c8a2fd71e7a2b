//! CSV export of the submission log
//!
//! Spreadsheet tools expect the byte-order mark, and every field is quoted so
//! part numbers with leading zeros survive the round trip.

use crate::submission::{SubmissionEntry, TerminalMetric, TERMINAL_SLOTS};

use super::TabularError;

/// Bumped whenever the column layout changes
pub const EXPORT_SCHEMA_VERSION: u32 = 2;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const BASE_COLUMNS: [&str; 10] = [
    "Date",
    "Time",
    "Shift",
    "Worker Name",
    "Machine Name",
    "FG Part Number",
    "Cable Identification",
    "Produced Qty",
    "Produced Length",
    "Worked Hours",
];

/// One exported line, in [`export_columns`] order
pub type ExportRow = Vec<String>;

/// Header line: base columns, then measured/manual pairs per terminal slot
pub fn export_columns() -> Vec<String> {
    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
    for slot in 1..=TERMINAL_SLOTS {
        for metric in TerminalMetric::ALL {
            columns.push(format!("T{} {} (Measured)", slot, metric.label()));
            columns.push(format!("T{} {} (Manual)", slot, metric.label()));
        }
    }
    columns
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Project an entry into export columns
pub fn export_row(entry: &SubmissionEntry) -> ExportRow {
    let mut row = vec![
        entry.timestamp.format("%Y-%m-%d").to_string(),
        entry.timestamp.format("%H:%M").to_string(),
        entry.shift.clone(),
        entry.worker_name.clone(),
        entry.machine_name.clone(),
        entry.fg_part_no.clone(),
        entry.cable_id.clone(),
        entry.produced_qty.to_string(),
        entry.produced_length.to_string(),
        entry.worked_hours.to_string(),
    ];
    for slot in 0..TERMINAL_SLOTS {
        let terminal = entry.terminals.get(slot);
        for metric in TerminalMetric::ALL {
            let reading = terminal.map(|t| t.get(metric)).unwrap_or_default();
            row.push(optional_number(reading.measured));
            row.push(optional_number(reading.manual));
        }
    }
    row
}

/// Encode rows as BOM-prefixed, fully quoted CSV
pub fn write_csv(columns: &[String], rows: &[ExportRow]) -> Result<Vec<u8>, TabularError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| TabularError::Io(e.into_error()))
}
