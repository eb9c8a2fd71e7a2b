//! Real-time event types for the Linetrack WebSocket.
//!
//! Every frame in either direction is `{"type": <Name>, "data": {...}}`.
//! Worker and dashboard pages send [`ClientEvent`]s; the server answers with
//! [`ServerEvent`]s addressed to a connection, a machine room, or every
//! dashboard.

use chrono::{DateTime, Utc};
use linetrack_core::{ConnectionId, DashboardView, MachinePlan, SubmissionInput};
use serde::{Deserialize, Serialize};

/// Which page opened the socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Machine-side terminal
    #[default]
    Worker,
    /// Live dashboard
    Dashboard,
}

// ============================================================================
// INBOUND
// ============================================================================

/// Spreadsheet upload for one machine's plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpload {
    pub machine: String,
    pub file_name: String,
    /// Base64-encoded file bytes
    pub content: String,
}

/// Spreadsheet upload replacing the stock table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpload {
    pub file_name: String,
    /// Base64-encoded file bytes
    pub content: String,
}

/// Events sent by worker and dashboard pages
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    SubmitOutput(SubmissionInput),
    UploadPlan(PlanUpload),
    UploadStock(StockUpload),
    JoinMachine {
        machine: String,
    },
    CompletePlanLine {
        machine: String,
        line_id: String,
    },
    SendMessage {
        machine: String,
        message: String,
    },
    RequestDateData {
        #[serde(default)]
        date: Option<String>,
    },
}

impl ClientEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::SubmitOutput(_) => "SubmitOutput",
            ClientEvent::UploadPlan(_) => "UploadPlan",
            ClientEvent::UploadStock(_) => "UploadStock",
            ClientEvent::JoinMachine { .. } => "JoinMachine",
            ClientEvent::CompletePlanLine { .. } => "CompletePlanLine",
            ClientEvent::SendMessage { .. } => "SendMessage",
            ClientEvent::RequestDateData { .. } => "RequestDateData",
        }
    }
}

// ============================================================================
// OUTBOUND
// ============================================================================

/// Events pushed to connected pages
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerEvent {
    /// First frame on every socket
    Connected {
        version: String,
        connection_id: ConnectionId,
        page: PageKind,
        timestamp: DateTime<Utc>,
    },

    // -- Dashboard --
    UpdateDashboard(DashboardView),
    OnlineMachines {
        machines: Vec<String>,
    },

    // -- Machine rooms --
    MachinePlan(MachinePlan),
    MachineMessage {
        machine: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    // -- Acknowledgements --
    SubmissionResult {
        success: bool,
        message: String,
    },
    PlanUploadResult {
        success: bool,
        machine: String,
        lines: usize,
        message: String,
    },
    StockUploadResult {
        success: bool,
        rows: usize,
        message: String,
    },
    JoinResult {
        success: bool,
        machine: String,
        message: String,
    },
    MessageResult {
        success: bool,
        machine: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Frame could not be decoded
    Error {
        message: String,
    },
}

impl ServerEvent {
    /// Serialize to JSON string for WebSocket transmission.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
