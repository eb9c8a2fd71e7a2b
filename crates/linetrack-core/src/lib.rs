//! # Linetrack Core
//!
//! The live aggregation core of the Linetrack production dashboard.
//!
//! Shop-floor workers submit production entries from machine-side terminals;
//! this crate owns everything that happens to those entries once they arrive:
//!
//! - **Submission Store**: append-only log of validated production entries
//! - **Plan Registry**: per-machine work orders with pending/completed lines
//! - **Presence Tracker**: which connection is attached to which machine room
//! - **Stock Table**: initial cable stock, persisted as a JSON document
//! - **Aggregation**: date-filtered dashboard snapshots and per-machine totals
//! - **Tabular I/O**: spreadsheet import for plans/stock, CSV export of the log
//!
//! The transport (WebSocket fan-out, HTML pages) lives in `linetrack-server`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use linetrack_core::{FloorState, SubmissionInput};
//!
//! let mut floor = FloorState::default();
//!
//! let input: SubmissionInput = serde_json::from_value(serde_json::json!({
//!     "entryDate": "2024-05-01",
//!     "entryTime": "09:00",
//!     "machineName": "M1",
//!     "producedQty": "10",
//!     "producedLength": "5.0",
//!     "workedHours": "1.0",
//! }))?;
//! floor.submissions.append(input.into_entry()?)?;
//!
//! let view = floor.dashboard_view(Some("2024-05-01"));
//! assert_eq!(view.chart_data[0].total_qty, 10);
//! ```
//!
//! ## Feature Flags
//!
//! - `spreadsheets` (default): read `.xlsx`/`.xls`/`.ods` uploads with calamine.
//!   CSV uploads are always supported.

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod aggregation;
pub mod floor;
pub mod plan;
pub mod presence;
pub mod stock;
pub mod submission;
pub mod tabular;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Submissions
pub use submission::{
    resolve_metric, DateFilter, MetricReading, SubmissionEntry, SubmissionError,
    SubmissionInput, SubmissionStore, TerminalMeasurements, TerminalMetric, NOT_AVAILABLE,
    TERMINAL_SLOTS,
};

// Plans
pub use plan::{MachinePlan, PlanLine, PlanRegistry, PlanStatus, PLAN_LINE_LIMIT};

// Presence
pub use presence::{ConnectionId, PresenceTracker};

// Stock
pub use stock::{JsonStockFile, StockError, StockStore, StockTable, STOCK_FILE_NAME};

// Aggregation
pub use aggregation::{compute_dashboard_view, DashboardView, DisplayEntry, MachineTotal};

// Floor state
pub use floor::FloorState;

// Tabular import/export
pub use tabular::{
    export_columns, parse_table, write_csv, ExportRow, Table, TabularError,
    EXPORT_SCHEMA_VERSION,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        ConnectionId, DashboardView, FloorState, JsonStockFile, MachinePlan, PlanRegistry,
        PresenceTracker, StockStore, StockTable, SubmissionEntry, SubmissionError,
        SubmissionInput, SubmissionStore, Table, TabularError,
    };
}
