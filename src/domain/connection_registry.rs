//! Live connection storage with per-connection locking.
//!
//! [`ConnectionRegistry`] stores every admitted connection in a `HashMap`
//! where each entry is individually protected by a [`tokio::sync::Mutex`].
//! Timer ticks, subscribe requests and disconnects for one connection are
//! serialized on that lock; different connections never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, mpsc};

use super::connection::{Connection, ConnectionEntry, ConnectionSummary};
use super::ConnectionId;
use crate::error::GatewayError;

/// Outbound buffer size used when none is configured.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 16;

/// Central store for all live connections.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and a per-entry
/// `Arc<Mutex<ConnectionEntry>>` so that a timer task can hold its own
/// entry without going through the map on every tick.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<Mutex<ConnectionEntry>>>>,
    outbound_capacity: usize,
}

impl ConnectionRegistry {
    /// Creates an empty registry whose connections buffer at most
    /// `outbound_capacity` undelivered events each.
    #[must_use]
    pub fn new(outbound_capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    /// Admits a peer that completed the handshake.
    ///
    /// The returned [`Connection`] is the transport's end; its teardown is
    /// observed through [`ConnectionRegistry::disconnect`].
    pub async fn connect(&self) -> Connection {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(self.outbound_capacity);
        let entry = Arc::new(Mutex::new(ConnectionEntry::new(id, tx)));
        self.connections.write().await.insert(id, entry);
        tracing::info!(connection_id = %id, "connection admitted");
        Connection::new(id, rx)
    }

    /// Tears down a connection: cancels its timer, then forgets it.
    ///
    /// Returns `false` if the connection was already removed; calling this
    /// more than once is harmless. Once it returns, nothing more is
    /// delivered to the connection.
    pub async fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(&id);
        let Some(entry) = removed else {
            tracing::debug!(connection_id = %id, "disconnect for unknown connection ignored");
            return false;
        };
        let cancelled = entry.lock().await.close();
        tracing::info!(connection_id = %id, timer_cancelled = cancelled, "connection removed");
        true
    }

    /// Returns the entry of a live connection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConnectionNotFound`] if no connection with
    /// the given ID is registered.
    pub async fn get(&self, id: ConnectionId) -> Result<Arc<Mutex<ConnectionEntry>>, GatewayError> {
        let map = self.connections.read().await;
        map.get(&id)
            .cloned()
            .ok_or(GatewayError::ConnectionNotFound(*id.as_uuid()))
    }

    /// Returns `true` if the connection is registered.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    /// Returns summaries of all live connections.
    pub async fn list(&self) -> Vec<ConnectionSummary> {
        let map = self.connections.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for entry_lock in map.values() {
            let entry = entry_lock.lock().await;
            summaries.push(ConnectionSummary::from(&*entry));
        }
        summaries.sort_by_key(|s| s.connected_at);
        summaries
    }

    /// Returns the number of connections with an active subscription.
    pub async fn subscription_count(&self) -> usize {
        let map = self.connections.read().await;
        let mut count = 0;
        for entry_lock in map.values() {
            if entry_lock.lock().await.subscription().is_some() {
                count += 1;
            }
        }
        count
    }

    /// Returns the number of live connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connection is registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_OUTBOUND_CAPACITY)
    }
}
