//! Submission Entry - one production report from a machine-side terminal
//!
//! The worker page has gone through several payload layouts. The typed
//! [`SubmissionInput`] keeps a fixed required core (date, time, the three
//! production numbers), optional descriptive fields, and an explicit `extra`
//! map for keys this version does not interpret.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::terminal::{TerminalInput, TerminalMeasurements, TERMINAL_SLOTS};

/// Sentinel for descriptive fields the worker left out
pub const NOT_AVAILABLE: &str = "N/A";

/// Display format for submission timestamps
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Why a submission was refused
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    /// A required field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// Date/time strings did not parse
    #[error("Invalid date/time: {0}")]
    InvalidTimestamp(String),
    /// A numeric field did not parse
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    /// Quantity, length, or hours was zero or negative
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    /// More terminal slots than a submission can describe
    #[error("Too many terminal slots: {0} (max {TERMINAL_SLOTS})")]
    TooManyTerminals(usize),
}

// ============================================================================
// SUBMISSION ENTRY
// ============================================================================

/// A validated production entry
///
/// Immutable once appended to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionEntry {
    /// Local shop-floor time of the production run
    pub timestamp: NaiveDateTime,
    pub machine_name: String,
    pub worker_name: String,
    pub shift: String,
    pub order_no: String,
    pub fg_part_no: String,
    pub applicator_no: String,
    pub cable_id: String,
    pub produced_qty: i64,
    pub produced_length: f64,
    pub worked_hours: f64,
    /// At most [`TERMINAL_SLOTS`] inspections
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub terminals: Vec<TerminalMeasurements>,
    /// Payload keys passed through untouched
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl SubmissionEntry {
    /// Create an entry with sentinel descriptive fields
    pub fn new(
        timestamp: NaiveDateTime,
        machine_name: impl Into<String>,
        produced_qty: i64,
        produced_length: f64,
        worked_hours: f64,
    ) -> Self {
        Self {
            timestamp,
            machine_name: machine_name.into(),
            worker_name: NOT_AVAILABLE.to_string(),
            shift: NOT_AVAILABLE.to_string(),
            order_no: NOT_AVAILABLE.to_string(),
            fg_part_no: NOT_AVAILABLE.to_string(),
            applicator_no: NOT_AVAILABLE.to_string(),
            cable_id: NOT_AVAILABLE.to_string(),
            produced_qty,
            produced_length,
            worked_hours,
            terminals: vec![],
            extra: BTreeMap::new(),
        }
    }

    /// Date component of the timestamp
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Check the positive-number invariants
    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.produced_qty <= 0 {
            return Err(SubmissionError::NonPositive {
                field: "producedQty",
                value: self.produced_qty as f64,
            });
        }
        if self.produced_length.is_nan() || self.produced_length <= 0.0 {
            return Err(SubmissionError::NonPositive {
                field: "producedLength",
                value: self.produced_length,
            });
        }
        if self.worked_hours.is_nan() || self.worked_hours <= 0.0 {
            return Err(SubmissionError::NonPositive {
                field: "workedHours",
                value: self.worked_hours,
            });
        }
        if self.terminals.len() > TERMINAL_SLOTS {
            return Err(SubmissionError::TooManyTerminals(self.terminals.len()));
        }
        Ok(())
    }

    pub fn time_display(&self) -> String {
        self.timestamp.format(TIMESTAMP_DISPLAY_FORMAT).to_string()
    }
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// Submission payload as sent by the worker page
///
/// Numbers may arrive as JSON numbers or as strings typed into form fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    pub entry_date: Option<String>,
    pub entry_time: Option<String>,
    pub shift: Option<String>,
    pub worker_name: Option<String>,
    pub machine_name: Option<String>,
    pub order_no: Option<String>,
    pub fg_part_no: Option<String>,
    pub applicator_no: Option<String>,
    pub cable_id: Option<String>,
    pub produced_qty: Option<Value>,
    pub produced_length: Option<Value>,
    pub worked_hours: Option<Value>,
    #[serde(default)]
    pub terminals: Vec<TerminalInput>,
    /// Keys from other payload layouts
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SubmissionInput {
    /// Parse the payload into an entry.
    ///
    /// Only parsing happens here; the positive-number invariants are enforced
    /// by [`SubmissionEntry::validate`] when the entry is appended.
    pub fn into_entry(self) -> Result<SubmissionEntry, SubmissionError> {
        let date = required_text("entryDate", self.entry_date.as_deref())?;
        let time = required_text("entryTime", self.entry_time.as_deref())?;
        let timestamp = parse_timestamp(date, time)?;

        let produced_qty = parse_integer("producedQty", self.produced_qty.as_ref())?;
        let produced_length = parse_real("producedLength", self.produced_length.as_ref())?;
        let worked_hours = parse_real("workedHours", self.worked_hours.as_ref())?;

        if self.terminals.len() > TERMINAL_SLOTS {
            return Err(SubmissionError::TooManyTerminals(self.terminals.len()));
        }
        let terminals = self
            .terminals
            .into_iter()
            .map(TerminalInput::into_measurements)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SubmissionEntry {
            timestamp,
            machine_name: text_or_sentinel(self.machine_name),
            worker_name: text_or_sentinel(self.worker_name),
            shift: text_or_sentinel(self.shift),
            order_no: text_or_sentinel(self.order_no),
            fg_part_no: text_or_sentinel(self.fg_part_no),
            applicator_no: text_or_sentinel(self.applicator_no),
            cable_id: text_or_sentinel(self.cable_id),
            produced_qty,
            produced_length,
            worked_hours,
            terminals,
            extra: self.extra,
        })
    }
}

// ============================================================================
// FIELD PARSING
// ============================================================================

fn required_text<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, SubmissionError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SubmissionError::MissingField(field)),
    }
}

fn text_or_sentinel(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Combine `YYYY-MM-DD` and `HH:MM` (seconds optional)
pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, SubmissionError> {
    let invalid = || SubmissionError::InvalidTimestamp(format!("{} {}", date, time));
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
    let clock = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
        .map_err(|_| invalid())?;
    Ok(day.and_time(clock))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_integer(field: &'static str, value: Option<&Value>) -> Result<i64, SubmissionError> {
    let invalid = |v: &Value| SubmissionError::InvalidNumber {
        field,
        value: value_text(v),
    };
    match value {
        None | Some(Value::Null) => Err(SubmissionError::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(SubmissionError::MissingField(field)),
        Some(v @ Value::Number(n)) => n
            .as_i64()
            .or_else(|| integral(n.as_f64()?))
            .ok_or_else(|| invalid(v)),
        Some(v @ Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

/// `10.0` counts as 10; fractions and out-of-range values do not
fn integral(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

fn parse_real(field: &'static str, value: Option<&Value>) -> Result<f64, SubmissionError> {
    parse_optional_real(field, value)?.ok_or(SubmissionError::MissingField(field))
}

/// Parse an optional real; blank strings and nulls are `None`.
pub(crate) fn parse_optional_real(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<f64>, SubmissionError> {
    let invalid = |v: &Value| SubmissionError::InvalidNumber {
        field,
        value: value_text(v),
    };
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v @ Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| invalid(v)),
        Some(v @ Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
            _ => Err(invalid(v)),
        },
        Some(v) => Err(invalid(v)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
