//! WebSocket client frames and the commands they decode to.
//!
//! Every frame is a JSON object naming an event and carrying an optional
//! `data` payload:
//!
//! ```json
//! {"event": "subscribeToTimer", "data": 1000}
//! {"event": "unsubscribeFromTimer"}
//! ```
//!
//! Server → client frames are [`crate::domain::OutboundEvent`]s.

use serde::Deserialize;

use crate::error::GatewayError;

/// Client event starting or restarting the connection's timer.
pub const SUBSCRIBE_TO_TIMER: &str = "subscribeToTimer";

/// Client event stopping the connection's timer.
pub const UNSUBSCRIBE_FROM_TIMER: &str = "unsubscribeFromTimer";

/// Raw client frame before dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    /// Event name.
    pub event: String,
    /// Event payload; `null` when absent.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// Start or restart the timer at `interval_ms` cadence.
    SubscribeToTimer {
        /// Requested cadence in milliseconds, not yet range-checked.
        interval_ms: i64,
    },
    /// Stop the timer.
    UnsubscribeFromTimer,
}

impl ClientCommand {
    /// Decodes a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedMessage`] for invalid JSON or an
    /// unknown event, and [`GatewayError::InvalidInterval`] when a
    /// `subscribeToTimer` payload is missing or not an integer.
    pub fn parse(text: &str) -> Result<Self, GatewayError> {
        let frame: ClientFrame = serde_json::from_str(text)
            .map_err(|e| GatewayError::MalformedMessage(e.to_string()))?;

        match frame.event.as_str() {
            SUBSCRIBE_TO_TIMER => frame
                .data
                .as_i64()
                .map(|interval_ms| Self::SubscribeToTimer { interval_ms })
                .ok_or_else(|| GatewayError::InvalidInterval(frame.data.to_string())),
            UNSUBSCRIBE_FROM_TIMER => Ok(Self::UnsubscribeFromTimer),
            other => Err(GatewayError::MalformedMessage(format!(
                "unknown event `{other}`"
            ))),
        }
    }
}
