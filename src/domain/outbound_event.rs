//! Named events pushed from the server to a connection.
//!
//! Each variant serializes to a `{"event": <name>, "data": <payload>}`
//! frame, which is exactly what the WebSocket writer sends as a text
//! message.

use serde::Serialize;

use super::TimerEvent;

/// Event delivered to a single connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundEvent {
    /// One tick of the connection's subscribed timer.
    Timer(TimerEvent),
}

impl OutboundEvent {
    /// Returns the wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Timer(_) => "timer",
        }
    }
}
