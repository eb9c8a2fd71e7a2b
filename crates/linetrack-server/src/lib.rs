//! Linetrack Server Library
//!
//! HTTP and WebSocket layer for the production-tracking dashboard. The
//! `linetrack` binary wires these pieces to a listener; the end-to-end tests
//! drive them in memory.

pub mod config;
pub mod dashboard;

pub use config::{Cli, ConfigError, ServerConfig};
pub use dashboard::state::AppState;
