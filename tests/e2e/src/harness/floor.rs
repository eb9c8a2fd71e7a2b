//! Test Floor
//!
//! A running floor without a listener. Clients are registered with the real
//! connection hub and receive exactly the frames a browser would.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use linetrack_core::{ConnectionId, FloorState, JsonStockFile, StockStore};
use linetrack_server::AppState;
use linetrack_server::dashboard::events::{ClientEvent, PageKind};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Manager for an isolated floor
///
/// # Example
///
/// ```rust,ignore
/// let floor = TestFloor::new_temp();
/// let mut dashboard = floor.connect(PageKind::Dashboard).await;
/// dashboard.drain(); // greeting
/// ```
pub struct TestFloor {
    pub state: AppState,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: TempDir,
    data_dir: PathBuf,
    pages_dir: PathBuf,
}

impl TestFloor {
    /// Fresh floor with an empty stock file location
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        let pages_dir = temp_dir.path().join("pages");
        std::fs::create_dir_all(&pages_dir).expect("Failed to create pages dir");
        Self::open(temp_dir, data_dir, pages_dir)
    }

    /// Reopen over an existing data directory, as a restarted server would
    pub fn restart(self) -> Self {
        let Self {
            _temp_dir: temp_dir,
            data_dir,
            pages_dir,
            ..
        } = self;
        Self::open(temp_dir, data_dir, pages_dir)
    }

    fn open(temp_dir: TempDir, data_dir: PathBuf, pages_dir: PathBuf) -> Self {
        let store = Arc::new(JsonStockFile::in_dir(&data_dir));
        let floor = FloorState::with_stock(store.load());
        let state = AppState::new(floor, store, pages_dir.clone());
        Self {
            state,
            _temp_dir: temp_dir,
            data_dir,
            pages_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Write a page into the pages directory
    pub fn write_page(&self, name: &str, html: &str) {
        std::fs::write(self.pages_dir.join(name), html).expect("Failed to write page");
    }

    pub async fn connect(&self, page: PageKind) -> TestClient {
        let (id, rx) = self.state.connect(page).await;
        TestClient {
            id,
            rx,
            state: self.state.clone(),
        }
    }

    /// Worker connected and joined to `machine`, greeting frames drained
    pub async fn worker_on(&self, machine: &str) -> TestClient {
        let mut worker = self.connect(PageKind::Worker).await;
        worker
            .send(ClientEvent::JoinMachine {
                machine: machine.to_string(),
            })
            .await;
        worker.drain();
        worker
    }

    /// Dashboard connected, greeting frames drained
    pub async fn dashboard(&self) -> TestClient {
        let mut dashboard = self.connect(PageKind::Dashboard).await;
        dashboard.drain();
        dashboard
    }
}

/// An in-memory page connection
pub struct TestClient {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
    state: AppState,
}

impl TestClient {
    pub async fn send(&self, event: ClientEvent) {
        self.state.dispatch(self.id, event).await;
    }

    /// Send a raw text frame, as the socket would deliver it
    pub async fn send_text(&self, text: &str) {
        self.state.dispatch_text(self.id, text).await;
    }

    pub async fn send_json(&self, frame: Value) {
        self.send_text(&frame.to_string()).await;
    }

    /// Every frame queued so far, decoded
    pub fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(text) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&text).expect("Server sent invalid JSON"));
        }
        frames
    }

    /// Drained frames of one type, `data` payload only
    pub fn drain_of(&mut self, event_type: &str) -> Vec<Value> {
        self.drain()
            .into_iter()
            .filter(|frame| frame["type"] == event_type)
            .map(|frame| frame["data"].clone())
            .collect()
    }

    pub async fn disconnect(self) {
        self.state.disconnect(self.id).await;
    }
}
