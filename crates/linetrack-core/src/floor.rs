//! Floor State
//!
//! The stores a running server owns, bundled so they can be handed to the
//! event layer as one value and locked as one unit.

use chrono::{Local, NaiveDate};

use crate::aggregation::{compute_dashboard_view, DashboardView};
use crate::plan::PlanRegistry;
use crate::presence::PresenceTracker;
use crate::stock::StockTable;
use crate::submission::{DateFilter, SubmissionStore};

/// All mutable production state
#[derive(Debug, Clone, Default)]
pub struct FloorState {
    pub submissions: SubmissionStore,
    pub plans: PlanRegistry,
    pub presence: PresenceTracker,
    pub stock: StockTable,
}

impl FloorState {
    /// Start with an empty log and the given (persisted) stock table
    pub fn with_stock(stock: StockTable) -> Self {
        Self {
            stock,
            ..Default::default()
        }
    }

    /// Snapshot for `date` (default: today, local time)
    pub fn dashboard_view(&self, date: Option<&str>) -> DashboardView {
        self.dashboard_view_on(date, Local::now().date_naive())
    }

    /// Snapshot with an explicit notion of "today"
    pub fn dashboard_view_on(&self, date: Option<&str>, today: NaiveDate) -> DashboardView {
        let filter = DateFilter::resolve(date, today);
        compute_dashboard_view(&self.submissions, &self.plans, &self.stock, filter)
    }

    /// Replace the stock table wholesale
    pub fn replace_stock(&mut self, stock: StockTable) {
        self.stock = stock;
    }
}
