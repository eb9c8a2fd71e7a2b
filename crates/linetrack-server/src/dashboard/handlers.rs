//! HTTP endpoint handlers

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use linetrack_core::{EXPORT_SCHEMA_VERSION, export_columns, write_csv};
use serde_json::Value;
use tracing::{error, info};

use super::state::AppState;

pub const EXPORT_FILE_NAME: &str = "production_data.csv";
pub const EXPORT_SCHEMA_HEADER: &str = "x-linetrack-export-schema";

/// GET /export: full submission log, oldest first
pub async fn export_csv(State(state): State<AppState>) -> Response {
    let rows = state.floor.lock().await.submissions.export_all();

    let body = match write_csv(&export_columns(), &rows) {
        Ok(body) => body,
        Err(e) => {
            error!("CSV export failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Export failed").into_response();
        }
    };

    info!(rows = rows.len(), bytes = body.len(), "Submission log exported");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        [(EXPORT_SCHEMA_HEADER, EXPORT_SCHEMA_VERSION.to_string())],
        body,
    )
        .into_response()
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let (submissions, online_machines) = {
        let floor = state.floor.lock().await;
        (floor.submissions.len(), floor.presence.online_machines().len())
    };

    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.start_time.elapsed().as_secs(),
        "submissions": submissions,
        "onlineMachines": online_machines,
        "connections": state.hub.count().await,
        "dashboards": state.hub.dashboard_count().await,
    }))
}
