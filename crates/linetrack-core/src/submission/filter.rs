//! Date filter for dashboard queries

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

/// Which slice of the log a query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "date", rename_all = "lowercase")]
pub enum DateFilter {
    /// Entries whose timestamp falls on this date
    On(NaiveDate),
    /// The whole log (malformed filter strings land here)
    Unfiltered,
}

impl DateFilter {
    /// Resolve a raw `YYYY-MM-DD` string.
    ///
    /// Absent or blank means `today`. A string that does not parse means no
    /// filter at all: the caller gets the full log rather than an error.
    pub fn resolve(raw: Option<&str>, today: NaiveDate) -> Self {
        let raw = match raw.map(str::trim) {
            None | Some("") => return DateFilter::On(today),
            Some(raw) => raw,
        };
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => DateFilter::On(date),
            Err(e) => {
                warn!(filter = raw, error = %e, "Malformed date filter, returning unfiltered log");
                DateFilter::Unfiltered
            }
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DateFilter::On(d) => *d == date,
            DateFilter::Unfiltered => true,
        }
    }

    /// The filter date, if any
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateFilter::On(d) => Some(*d),
            DateFilter::Unfiltered => None,
        }
    }
}
