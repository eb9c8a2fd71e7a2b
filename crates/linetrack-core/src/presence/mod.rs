//! # Presence Tracker
//!
//! Maps live connections to the machine room they joined. A machine is
//! online while at least one connection claims it.
//!
//! A connection represents at most one machine. Joining again without
//! leaving overwrites the previous claim (last write wins), so a terminal
//! that switches machines never shows up in two rooms.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Identity of one live socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection -> machine table
#[derive(Debug, Clone, Default)]
pub struct PresenceTracker {
    machines: HashMap<ConnectionId, String>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `connection` to `machine`, replacing any earlier claim.
    ///
    /// Returns the online machines after the change.
    pub fn join(&mut self, connection: ConnectionId, machine: impl Into<String>) -> Vec<String> {
        let machine = machine.into();
        if let Some(previous) = self.machines.insert(connection, machine.clone()) {
            if previous != machine {
                debug!(%connection, from = %previous, to = %machine, "Connection switched machine");
            }
        }
        self.online_machines()
    }

    /// Detach `connection`; unknown connections are ignored.
    ///
    /// Returns the online machines after the change.
    pub fn leave(&mut self, connection: &ConnectionId) -> Vec<String> {
        if let Some(machine) = self.machines.remove(connection) {
            debug!(%connection, %machine, "Connection left machine");
        }
        self.online_machines()
    }

    pub fn is_online(&self, machine: &str) -> bool {
        self.machines.values().any(|m| m == machine)
    }

    /// Deduplicated, ascending
    pub fn online_machines(&self) -> Vec<String> {
        self.machines
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Members of a machine room
    pub fn connections_in(&self, machine: &str) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self
            .machines
            .iter()
            .filter(|(_, m)| m.as_str() == machine)
            .map(|(c, _)| *c)
            .collect();
        members.sort();
        members
    }

    pub fn machine_of(&self, connection: &ConnectionId) -> Option<&str> {
        self.machines.get(connection).map(String::as_str)
    }

    /// Number of attached connections
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}
