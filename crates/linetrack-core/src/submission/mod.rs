//! Submission Module
//!
//! Production entries from worker terminals:
//! - Typed payload parsing with an explicit pass-through map
//! - Positive quantity/length/hours invariants
//! - Terminal quality readings with manual-over-measured resolution
//! - Append-only, date-filtered log

mod entry;
mod filter;
mod store;
mod terminal;

pub use entry::{
    parse_timestamp, SubmissionEntry, SubmissionError, SubmissionInput, NOT_AVAILABLE,
    TIMESTAMP_DISPLAY_FORMAT,
};
pub use filter::DateFilter;
pub use store::SubmissionStore;
pub use terminal::{
    resolve_metric, MetricInput, MetricReading, TerminalInput, TerminalMeasurements,
    TerminalMetric, TERMINAL_SLOTS,
};
