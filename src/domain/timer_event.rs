//! Timer tick payload.
//!
//! A [`TimerEvent`] is produced once per tick of a subscription and sent to
//! exactly one connection. On the wire it is the bare ISO-8601 timestamp
//! carried in the `data` field of a `timer` frame.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One tick of a subscribed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TimerEvent {
    timestamp: DateTime<Utc>,
}

impl TimerEvent {
    /// Creates an event stamped with `timestamp`.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    /// Returns the tick timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
