//! Stock Module
//!
//! Initial cable stock per cable identifier. The table is uploaded as a
//! spreadsheet, shown on every dashboard snapshot, and persisted as a small
//! JSON document so it survives restarts. Submissions never deduct from it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tabular::{Table, TabularError};

/// File name used inside the data directory
pub const STOCK_FILE_NAME: &str = "stock_levels.json";

/// Column holding the cable identifier
pub const CABLE_ID_COLUMN: &str = "Cable ID";

/// Column holding the initial stock in metres
pub const INITIAL_STOCK_COLUMN: &str = "Initial Stock (M)";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Stock persistence error
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// STOCK TABLE
// ============================================================================

/// Cable identifier -> initial stock (metres)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockTable(BTreeMap<String, f64>);

impl StockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a stock sheet.
    ///
    /// Requires the `Cable ID` and `Initial Stock (M)` columns. Rows without a
    /// cable identifier are skipped; a later row for the same cable wins.
    pub fn from_table(table: &Table) -> Result<Self, TabularError> {
        table.require_columns(&[CABLE_ID_COLUMN, INITIAL_STOCK_COLUMN])?;

        let mut levels = BTreeMap::new();
        for (i, row) in table.rows.iter().enumerate() {
            let cable = row.get(CABLE_ID_COLUMN).map(String::as_str).unwrap_or("");
            if cable.is_empty() {
                continue;
            }
            let raw = row.get(INITIAL_STOCK_COLUMN).map(String::as_str).unwrap_or("");
            let quantity = raw
                .parse::<f64>()
                .ok()
                .filter(|q| q.is_finite())
                .ok_or_else(|| TabularError::InvalidNumber {
                    column: INITIAL_STOCK_COLUMN.to_string(),
                    // header is line 1
                    row: i + 2,
                    value: raw.to_string(),
                })?;
            levels.insert(cable.to_string(), quantity);
        }
        Ok(Self(levels))
    }

    pub fn get(&self, cable_id: &str) -> Option<f64> {
        self.0.get(cable_id).copied()
    }

    pub fn insert(&mut self, cable_id: impl Into<String>, quantity: f64) {
        self.0.insert(cable_id.into(), quantity);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }
}

impl FromIterator<(String, f64)> for StockTable {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Stable storage for the stock table
pub trait StockStore: Send + Sync {
    /// Load the persisted table; never fails, an unreadable store is empty
    fn load(&self) -> StockTable;

    /// Overwrite the persisted table
    fn save(&self, table: &StockTable) -> Result<(), StockError>;
}

/// Stock table kept in a pretty-printed JSON file with sorted keys
#[derive(Debug, Clone)]
pub struct JsonStockFile {
    path: PathBuf,
}

impl JsonStockFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `stock_levels.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STOCK_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StockStore for JsonStockFile {
    fn load(&self) -> StockTable {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No stock file yet, starting empty");
                return StockTable::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read stock file, starting empty");
                return StockTable::new();
            }
        };

        match serde_json::from_str::<StockTable>(&text) {
            Ok(table) => {
                info!(path = %self.path.display(), cables = table.len(), "Stock levels loaded");
                table
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt stock file, starting empty");
                StockTable::new()
            }
        }
    }

    fn save(&self, table: &StockTable) -> Result<(), StockError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(table)?;
        std::fs::write(&self.path, json)?;
        info!(path = %self.path.display(), cables = table.len(), "Stock levels saved");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
