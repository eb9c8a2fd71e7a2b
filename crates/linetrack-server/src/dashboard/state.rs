//! Dashboard shared state

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use linetrack_core::{ConnectionId, FloorState, StockStore};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use super::events::{ClientEvent, PageKind, ServerEvent};
use super::hub::{ConnectionHub, Outbound};
use super::router::FanoutRouter;

/// Shared application state for the dashboard
///
/// All floor mutations and their deliveries happen under one lock, so events
/// are applied and observed one at a time in arrival order.
#[derive(Clone)]
pub struct AppState {
    pub floor: Arc<Mutex<FloorState>>,
    pub hub: ConnectionHub,
    pub router: Arc<FanoutRouter>,
    pub pages_dir: Arc<PathBuf>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(floor: FloorState, stock_store: Arc<dyn StockStore>, pages_dir: PathBuf) -> Self {
        Self {
            floor: Arc::new(Mutex::new(floor)),
            hub: ConnectionHub::new(),
            router: Arc::new(FanoutRouter::new(stock_store)),
            pages_dir: Arc::new(pages_dir),
            start_time: Instant::now(),
        }
    }

    /// Register a new socket and queue its greeting
    pub async fn connect(&self, page: PageKind) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection = ConnectionId::new();

        // Register under the floor lock: the greeting must be this socket's first frame
        let floor = self.floor.lock().await;
        let rx = self.hub.register(connection, page).await;
        let outbound = self.router.on_connect(&floor, connection, page);
        self.hub.deliver(outbound).await;

        (connection, rx)
    }

    /// Apply one inbound event and deliver its consequences
    pub async fn dispatch(&self, connection: ConnectionId, event: ClientEvent) {
        let mut floor = self.floor.lock().await;
        let outbound = self.router.route(&mut floor, connection, event);
        self.hub.deliver(outbound).await;
    }

    /// Decode a raw text frame and dispatch it; undecodable frames get an error reply
    pub async fn dispatch_text(&self, connection: ConnectionId, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.dispatch(connection, event).await,
            Err(e) => {
                warn!(connection = %connection, error = %e, "Undecodable frame");
                let reply = Outbound::to(
                    connection,
                    ServerEvent::Error {
                        message: format!("Invalid event: {}", e),
                    },
                );
                self.hub.deliver(vec![reply]).await;
            }
        }
    }

    /// Forget the socket and refresh the dashboards' online list
    pub async fn disconnect(&self, connection: ConnectionId) {
        self.hub.unregister(&connection).await;

        let mut floor = self.floor.lock().await;
        let outbound = self.router.on_disconnect(&mut floor, &connection);
        self.hub.deliver(outbound).await;
        debug!(connection = %connection, "Connection closed");
    }
}
