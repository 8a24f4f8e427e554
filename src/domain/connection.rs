//! Connection handle and the registry-side state behind it.
//!
//! The transport owns a [`Connection`] (the id plus the receiving half of
//! the outbound channel). The registry owns the matching
//! [`ConnectionEntry`] (the sending half plus the subscription).

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use super::{ConnectionId, OutboundEvent, Subscription};
use crate::error::GatewayError;

/// Transport-side handle for one admitted peer.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    outbound: mpsc::Receiver<OutboundEvent>,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, outbound: mpsc::Receiver<OutboundEvent>) -> Self {
        Self { id, outbound }
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Waits for the next event addressed to this connection.
    ///
    /// Returns `None` once the registry has released the connection.
    pub async fn recv(&mut self) -> Option<OutboundEvent> {
        self.outbound.recv().await
    }

    /// Returns the next pending event without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TryRecvError::Empty`] when nothing is pending and
    /// [`TryRecvError::Disconnected`] once the registry has released the
    /// connection.
    pub fn try_recv(&mut self) -> Result<OutboundEvent, TryRecvError> {
        self.outbound.try_recv()
    }

    /// Splits the handle into its id and outbound receiver.
    #[must_use]
    pub fn into_parts(self) -> (ConnectionId, mpsc::Receiver<OutboundEvent>) {
        (self.id, self.outbound)
    }
}

/// Result of handing one event to a connection's outbound buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The event was queued for the transport.
    Sent,
    /// The buffer was full and the event was discarded.
    Dropped,
}

/// Registry-side state of one connection.
///
/// Always accessed behind its own lock, so ticks, subscribe requests and
/// disconnects for the same connection never interleave.
#[derive(Debug)]
pub struct ConnectionEntry {
    id: ConnectionId,
    outbound: mpsc::Sender<OutboundEvent>,
    subscription: Option<Subscription>,
    generation: u64,
    open: bool,
    connected_at: DateTime<Utc>,
}

impl ConnectionEntry {
    /// Creates an open entry with no subscription.
    #[must_use]
    pub fn new(id: ConnectionId, outbound: mpsc::Sender<OutboundEvent>) -> Self {
        Self {
            id,
            outbound,
            subscription: None,
            generation: 0,
            open: true,
            connected_at: Utc::now(),
        }
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `false` once the connection has been closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the active subscription, if any.
    #[must_use]
    pub const fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    /// Returns the admission timestamp.
    #[must_use]
    pub const fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Reserves the generation for the next subscription.
    pub fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Returns `true` if a timer of `generation` may still deliver.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.open
            && self
                .subscription
                .as_ref()
                .is_some_and(|sub| sub.generation() == generation)
    }

    /// Installs `subscription`, cancelling the one it supersedes.
    ///
    /// Returns `true` if a previous subscription was replaced.
    pub fn replace_subscription(&mut self, subscription: Subscription) -> bool {
        match self.subscription.replace(subscription) {
            Some(previous) => {
                previous.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels the active subscription. Returns `true` if one was running.
    pub fn cancel_subscription(&mut self) -> bool {
        match self.subscription.take() {
            Some(sub) => {
                sub.cancel();
                true
            }
            None => false,
        }
    }

    /// Closes the entry and cancels its timer.
    ///
    /// Returns `true` if a subscription was cancelled.
    pub fn close(&mut self) -> bool {
        self.open = false;
        self.cancel_subscription()
    }

    /// Closes the entry from inside its own timer task.
    ///
    /// The subscription is released without aborting, since the caller is
    /// the task it would abort.
    pub fn close_from_timer(&mut self) {
        self.open = false;
        self.subscription = None;
    }

    /// Hands `event` to the outbound buffer without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DeliveryFailure`] if the transport side of
    /// the connection is gone.
    pub fn try_deliver(&self, event: OutboundEvent) -> Result<Delivery, GatewayError> {
        match self.outbound.try_send(event) {
            Ok(()) => Ok(Delivery::Sent),
            Err(TrySendError::Full(_)) => Ok(Delivery::Dropped),
            Err(TrySendError::Closed(event)) => Err(GatewayError::DeliveryFailure {
                connection_id: *self.id.as_uuid(),
                event: event.name(),
            }),
        }
    }
}

/// Lightweight view of a connection for listing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSummary {
    /// Connection identifier.
    pub connection_id: ConnectionId,
    /// Admission timestamp.
    pub connected_at: DateTime<Utc>,
    /// Interval of the active subscription, if subscribed.
    pub interval_ms: Option<u64>,
}

impl From<&ConnectionEntry> for ConnectionSummary {
    fn from(entry: &ConnectionEntry) -> Self {
        Self {
            connection_id: entry.id,
            connected_at: entry.connected_at,
            interval_ms: entry
                .subscription
                .as_ref()
                .map(|sub| sub.interval().as_millis()),
        }
    }
}
