//! Linetrack Server
//!
//! Serves the worker and dashboard pages, the live event socket and the CSV
//! export from one process. All production state lives in memory except the
//! stock table, which is reloaded from the data directory at startup.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use linetrack_core::{FloorState, JsonStockFile, StockStore};
use linetrack_server::dashboard;
use linetrack_server::{AppState, Cli, ServerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments first (before logging init, so --help/--version work cleanly)
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    info!("Linetrack v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    info!("Linetrack stopped");
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ServerConfig::from_cli(&cli).context("Invalid configuration")?;

    let stock_store = Arc::new(JsonStockFile::in_dir(&config.data_dir));
    info!(path = %stock_store.path().display(), "Using stock file");
    let floor = FloorState::with_stock(stock_store.load());

    info!(pages = %config.pages_dir.display(), "Serving pages");
    let state = AppState::new(floor, stock_store, config.pages_dir.clone());

    dashboard::serve(config.addr, state)
        .await
        .with_context(|| format!("Dashboard server failed on {}", config.addr))
}
