//! Connection hub
//!
//! Tracks every live socket and its outbound queue. The router decides who
//! receives what; the hub only resolves audiences to sockets and pushes the
//! serialized frames.

use std::collections::HashMap;
use std::sync::Arc;

use linetrack_core::ConnectionId;
use tokio::sync::{RwLock, mpsc};
use tracing::debug;

use super::events::{PageKind, ServerEvent};

/// Who receives an outbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every connected dashboard page
    Dashboards,
    /// Members of a machine room, resolved while the floor lock was held
    Room {
        machine: String,
        members: Vec<ConnectionId>,
    },
    /// A single connection
    Connection(ConnectionId),
}

/// An event paired with its audience
#[derive(Debug, Clone)]
pub struct Outbound {
    pub audience: Audience,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn dashboards(event: ServerEvent) -> Self {
        Self {
            audience: Audience::Dashboards,
            event,
        }
    }

    pub fn room(machine: impl Into<String>, members: Vec<ConnectionId>, event: ServerEvent) -> Self {
        Self {
            audience: Audience::Room {
                machine: machine.into(),
                members,
            },
            event,
        }
    }

    pub fn to(connection: ConnectionId, event: ServerEvent) -> Self {
        Self {
            audience: Audience::Connection(connection),
            event,
        }
    }
}

struct ConnectionHandle {
    page: PageKind,
    outbox: mpsc::UnboundedSender<String>,
}

/// Registry of live connections and their outboxes
#[derive(Clone, Default)]
pub struct ConnectionHub {
    connections: Arc<RwLock<HashMap<ConnectionId, ConnectionHandle>>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiving end of its outbox
    pub async fn register(&self, id: ConnectionId, page: PageKind) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut connections = self.connections.write().await;
        connections.insert(id, ConnectionHandle { page, outbox: tx });
        debug!(connection = %id, ?page, total = connections.len(), "Connection registered");
        rx
    }

    pub async fn unregister(&self, id: &ConnectionId) {
        let mut connections = self.connections.write().await;
        if connections.remove(id).is_some() {
            debug!(connection = %id, total = connections.len(), "Connection unregistered");
        }
    }

    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn dashboard_count(&self) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|handle| handle.page == PageKind::Dashboard)
            .count()
    }

    /// Push each event to its audience, in order. Returns the number of frames queued.
    pub async fn deliver(&self, outbound: Vec<Outbound>) -> usize {
        if outbound.is_empty() {
            return 0;
        }

        let connections = self.connections.read().await;
        let mut queued = 0;

        for Outbound { audience, event } in outbound {
            let json = event.to_json();
            let mut push = |id: &ConnectionId, handle: &ConnectionHandle| {
                if handle.outbox.send(json.clone()).is_ok() {
                    queued += 1;
                } else {
                    // Socket task already gone; unregister will follow
                    debug!(connection = %id, "Dropped frame for closed connection");
                }
            };

            match &audience {
                Audience::Dashboards => {
                    for (id, handle) in connections.iter() {
                        if handle.page == PageKind::Dashboard {
                            push(id, handle);
                        }
                    }
                }
                Audience::Room { members, .. } => {
                    for id in members {
                        if let Some(handle) = connections.get(id) {
                            push(id, handle);
                        }
                    }
                }
                Audience::Connection(id) => {
                    if let Some(handle) = connections.get(id) {
                        push(id, handle);
                    }
                }
            }
        }

        queued
    }
}
