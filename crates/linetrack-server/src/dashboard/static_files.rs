//! Worker and dashboard pages, read from the pages directory on each request.

use std::path::Path;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::warn;

use super::state::AppState;

pub const WORKER_PAGE: &str = "worker.html";
pub const DASHBOARD_PAGE: &str = "dashboard.html";

/// GET / redirects to the dashboard
pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

/// GET /worker
pub async fn serve_worker(State(state): State<AppState>) -> Response {
    serve_page(&state.pages_dir, WORKER_PAGE).await
}

/// GET /dashboard
pub async fn serve_dashboard(State(state): State<AppState>) -> Response {
    serve_page(&state.pages_dir, DASHBOARD_PAGE).await
}

async fn serve_page(dir: &Path, name: &str) -> Response {
    let path = dir.join(name);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Page not available");
            (
                StatusCode::NOT_FOUND,
                format!("Error: {} not found in {}", name, dir.display()),
            )
                .into_response()
        }
    }
}
