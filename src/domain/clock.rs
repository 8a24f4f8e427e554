//! Wall-clock source for tick timestamps.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Wall-clock time derived from the tokio monotonic clock.
///
/// The wall time is sampled once at construction and advanced by the
/// monotonic elapsed time afterwards, so timestamps taken at successive
/// ticks never go backwards when the system clock is adjusted. Under a
/// paused tokio runtime the clock follows virtual time.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    wall_anchor: DateTime<Utc>,
    mono_anchor: Instant,
}

impl Clock {
    /// Anchors a new clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wall_anchor: Utc::now(),
            mono_anchor: Instant::now(),
        }
    }

    /// Returns the current time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.mono_anchor.elapsed())
            .ok()
            .and_then(|elapsed| self.wall_anchor.checked_add_signed(elapsed))
            .unwrap_or_else(Utc::now)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
