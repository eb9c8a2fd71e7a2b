//! Submission Store
//!
//! Append-only log of production entries, kept for the lifetime of the
//! process. Entries are stored in arrival order and sorted only on the way
//! out.

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use super::entry::{SubmissionEntry, SubmissionError};
use super::filter::DateFilter;
use crate::tabular::{export_row, ExportRow};

/// In-memory submission log
#[derive(Debug, Clone, Default)]
pub struct SubmissionStore {
    entries: Vec<SubmissionEntry>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append an entry.
    ///
    /// A rejected entry leaves the log untouched.
    pub fn append(&mut self, entry: SubmissionEntry) -> Result<(), SubmissionError> {
        if let Err(e) = entry.validate() {
            warn!(machine = %entry.machine_name, error = %e, "Rejected submission");
            return Err(e);
        }
        debug!(
            machine = %entry.machine_name,
            qty = entry.produced_qty,
            at = %entry.timestamp,
            "Submission appended"
        );
        self.entries.push(entry);
        Ok(())
    }

    /// Entries for `date` (default: today), newest first
    pub fn query(&self, date: Option<&str>) -> Vec<&SubmissionEntry> {
        self.query_on(date, Local::now().date_naive())
    }

    /// Same as [`query`](Self::query) with an explicit notion of "today"
    pub fn query_on(&self, date: Option<&str>, today: NaiveDate) -> Vec<&SubmissionEntry> {
        self.filtered(DateFilter::resolve(date, today))
    }

    /// Entries matching `filter`, newest first.
    ///
    /// Entries sharing a timestamp come out latest-arrival first.
    pub fn filtered(&self, filter: DateFilter) -> Vec<&SubmissionEntry> {
        let mut matching: Vec<&SubmissionEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|e| filter.matches(e.date()))
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching
    }

    /// The whole log as export rows, oldest first
    pub fn export_all(&self) -> Vec<ExportRow> {
        let mut ordered: Vec<&SubmissionEntry> = self.entries.iter().collect();
        ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        ordered.into_iter().map(export_row).collect()
    }

    /// Entries in arrival order
    pub fn entries(&self) -> &[SubmissionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
