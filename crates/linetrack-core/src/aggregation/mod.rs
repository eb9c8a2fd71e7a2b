//! # Aggregation Engine
//!
//! Builds the dashboard snapshot for one date: the display log, the
//! per-machine quantity series for the chart, the machine selector list, and
//! the stock table. Snapshots are recomputed from scratch on every request;
//! submissions arrive at human data-entry pace, so there is nothing to cache.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::plan::PlanRegistry;
use crate::stock::StockTable;
use crate::submission::{DateFilter, SubmissionEntry, SubmissionStore, TerminalMetric};

// ============================================================================
// SNAPSHOT TYPES
// ============================================================================

/// One row of the dashboard table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEntry {
    pub time_display: String,
    pub worker_name: String,
    pub shift: String,
    pub machine_name: String,
    pub order_no: String,
    pub fg_part_no: String,
    pub applicator_no: String,
    pub cable_id: String,
    pub produced_qty: i64,
    pub produced_length: f64,
    pub worked_hours: f64,
    /// Resolved terminal readings, one map per slot
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub terminals: Vec<BTreeMap<TerminalMetric, Option<f64>>>,
}

impl From<&SubmissionEntry> for DisplayEntry {
    fn from(entry: &SubmissionEntry) -> Self {
        Self {
            time_display: entry.time_display(),
            worker_name: entry.worker_name.clone(),
            shift: entry.shift.clone(),
            machine_name: entry.machine_name.clone(),
            order_no: entry.order_no.clone(),
            fg_part_no: entry.fg_part_no.clone(),
            applicator_no: entry.applicator_no.clone(),
            cable_id: entry.cable_id.clone(),
            produced_qty: entry.produced_qty,
            produced_length: entry.produced_length,
            worked_hours: entry.worked_hours,
            terminals: entry.terminals.iter().map(|t| t.resolved()).collect(),
        }
    }
}

/// Chart point: total produced quantity for one machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineTotal {
    pub machine: String,
    pub total_qty: i64,
}

/// Everything a dashboard renders for one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Date the log was filtered on; `None` when the filter was unusable
    pub date: Option<NaiveDate>,
    /// Filtered entries, newest first
    pub log: Vec<DisplayEntry>,
    /// Quantity per machine, in order of first appearance in `log`
    pub chart_data: Vec<MachineTotal>,
    /// Machines with a registered plan, ascending
    pub machines: Vec<String>,
    pub stock: StockTable,
}

// ============================================================================
// COMPUTATION
// ============================================================================

/// Sum `produced_qty` per machine over `entries`
pub fn machine_totals<'a, I>(entries: I) -> Vec<MachineTotal>
where
    I: IntoIterator<Item = &'a SubmissionEntry>,
{
    let mut totals: Vec<MachineTotal> = Vec::new();
    for entry in entries {
        // negative quantities count as zero
        let qty = entry.produced_qty.max(0);
        match totals.iter_mut().find(|t| t.machine == entry.machine_name) {
            Some(total) => total.total_qty = total.total_qty.saturating_add(qty),
            None => totals.push(MachineTotal {
                machine: entry.machine_name.clone(),
                total_qty: qty,
            }),
        }
    }
    totals
}

/// Compute the snapshot for `filter`
pub fn compute_dashboard_view(
    submissions: &SubmissionStore,
    plans: &PlanRegistry,
    stock: &StockTable,
    filter: DateFilter,
) -> DashboardView {
    let entries = submissions.filtered(filter);
    DashboardView {
        date: filter.date(),
        log: entries.iter().map(|e| DisplayEntry::from(*e)).collect(),
        chart_data: machine_totals(entries.iter().copied()),
        machines: plans.list_machines(),
        stock: stock.clone(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
