//! # Plan Registry
//!
//! Each machine carries a short work order uploaded as a spreadsheet. Lines
//! start out pending and are ticked off by the workers attached to that
//! machine. A new upload replaces the machine's plan outright.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::tabular::{Row, Table};

/// Maximum number of lines kept from an uploaded plan sheet
pub const PLAN_LINE_LIMIT: usize = 10;

// ============================================================================
// PLAN LINES
// ============================================================================

/// Completion status of a plan line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    Pending,
    Completed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::Completed => "completed",
        }
    }
}

/// One row of a machine's work order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanLine {
    /// `<machine>_<position>`, position counted from 1
    pub line_id: String,
    pub status: PlanStatus,
    /// Sheet columns as uploaded
    pub fields: Row,
}

impl PlanLine {
    pub fn new(machine: &str, position: usize, fields: Row) -> Self {
        Self {
            line_id: format!("{}_{}", machine, position),
            status: PlanStatus::Pending,
            fields,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PlanStatus::Completed
    }
}

/// A machine's current plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MachinePlan {
    pub machine: String,
    /// Sheet header order, for display
    pub columns: Vec<String>,
    pub lines: Vec<PlanLine>,
}

impl MachinePlan {
    /// Empty plan for a machine nobody has uploaded for yet
    pub fn empty(machine: impl Into<String>) -> Self {
        Self {
            machine: machine.into(),
            ..Default::default()
        }
    }

    pub fn pending_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_completed()).count()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Plans keyed by machine name
#[derive(Debug, Clone, Default)]
pub struct PlanRegistry {
    plans: BTreeMap<String, MachinePlan>,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `machine`'s plan with the first [`PLAN_LINE_LIMIT`] rows of `table`.
    ///
    /// The previous plan is discarded, never merged.
    pub fn replace_plan(&mut self, machine: &str, table: Table) -> &MachinePlan {
        let Table { headers, rows } = table;
        let lines: Vec<PlanLine> = rows
            .into_iter()
            .take(PLAN_LINE_LIMIT)
            .enumerate()
            .map(|(i, fields)| PlanLine::new(machine, i + 1, fields))
            .collect();

        info!(machine, lines = lines.len(), "Plan replaced");

        let plan = MachinePlan {
            machine: machine.to_string(),
            columns: headers,
            lines,
        };
        self.plans.insert(machine.to_string(), plan);
        &self.plans[machine]
    }

    /// Mark the first line with `line_id` as completed.
    ///
    /// Returns `false` (and changes nothing) when the machine or line is unknown.
    pub fn mark_complete(&mut self, machine: &str, line_id: &str) -> bool {
        let Some(line) = self
            .plans
            .get_mut(machine)
            .and_then(|plan| plan.lines.iter_mut().find(|l| l.line_id == line_id))
        else {
            debug!(machine, line_id, "Ignoring completion for unknown plan line");
            return false;
        };
        line.status = PlanStatus::Completed;
        debug!(machine, line_id, "Plan line completed");
        true
    }

    /// Machines with a registered plan, ascending
    pub fn list_machines(&self) -> Vec<String> {
        self.plans.keys().cloned().collect()
    }

    pub fn get(&self, machine: &str) -> Option<&MachinePlan> {
        self.plans.get(machine)
    }

    /// The machine's plan, or an empty one
    pub fn plan_for(&self, machine: &str) -> MachinePlan {
        self.plans
            .get(machine)
            .cloned()
            .unwrap_or_else(|| MachinePlan::empty(machine))
    }
}

// ============================================================================
// TESTS
// ============================================================================
