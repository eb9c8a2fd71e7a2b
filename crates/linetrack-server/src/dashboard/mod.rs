//! Production Dashboard
//!
//! Worker and dashboard pages, the `/ws` event socket, CSV export and a
//! health probe, all served from one axum router.

pub mod events;
pub mod handlers;
pub mod hub;
pub mod router;
pub mod state;
pub mod static_files;
pub mod websocket;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use state::AppState;

/// Build the axum router with all dashboard routes
pub fn build_router(state: AppState) -> Router {
    let csp = SetResponseHeaderLayer::overriding(
        axum::http::header::CONTENT_SECURITY_POLICY,
        axum::http::HeaderValue::from_static(
            "default-src 'self' 'unsafe-inline' ws: wss: https://cdn.jsdelivr.net",
        ),
    );

    Router::new()
        .route("/", get(static_files::index))
        .route("/worker", get(static_files::serve_worker))
        .route("/dashboard", get(static_files::serve_dashboard))
        // Real-time events
        .route("/ws", get(websocket::ws_handler))
        .route("/export", get(handlers::export_csv))
        .route("/api/health", get(handlers::health_check))
        .layer(ServiceBuilder::new().concurrency_limit(100).layer(csp))
        .with_state(state)
}

/// Bind `addr` and serve until ctrl-c / SIGTERM
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "Dashboard available at http://{} (WebSocket at ws://{}/ws)",
        addr, addr
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Could not install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
