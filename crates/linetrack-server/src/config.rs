//! Server configuration
//!
//! Listener address from the command line (with environment fallbacks),
//! directories from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;

pub const DATA_DIR_ENV: &str = "LINETRACK_DATA_DIR";
pub const PAGES_DIR_ENV: &str = "LINETRACK_PAGES_DIR";

/// Linetrack - real-time production tracking dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "linetrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the worker and dashboard pages and their live event socket")]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "LINETRACK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "LINETRACK_PORT", default_value_t = 5000)]
    pub port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
    #[error("Could not determine a data directory; set LINETRACK_DATA_DIR")]
    NoDataDir,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Holds `stock_levels.json`
    pub data_dir: PathBuf,
    /// Holds `worker.html` and `dashboard.html`
    pub pages_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::resolve(
            cli,
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            std::env::var_os(PAGES_DIR_ENV).map(PathBuf::from),
        )
    }

    fn resolve(
        cli: &Cli,
        data_dir: Option<PathBuf>,
        pages_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let addr = parse_addr(&cli.host, cli.port)?;

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => ProjectDirs::from("com", "linetrack", "linetrack")
                .ok_or(ConfigError::NoDataDir)?
                .data_dir()
                .to_path_buf(),
        };

        Ok(Self {
            addr,
            data_dir,
            pages_dir: pages_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

fn parse_addr(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let host = host.trim();
    let candidate = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    };
    candidate
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(candidate))
}
