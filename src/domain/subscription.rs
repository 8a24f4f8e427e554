//! Per-connection timer subscription.
//!
//! A [`Subscription`] ties one connection to the tokio task driving its
//! repeating timer. Dropping a subscription detaches the task; only
//! [`Subscription::cancel`] stops it.

use tokio::task::JoinHandle;

use super::Interval;

/// The active timer of one connection.
#[derive(Debug)]
pub struct Subscription {
    /// Tick cadence requested by the peer.
    interval: Interval,
    /// Monotonic per-connection counter. A timer only delivers while its
    /// generation is the one stored in the connection entry.
    generation: u64,
    /// Task driving the repeating timer.
    timer: JoinHandle<()>,
}

impl Subscription {
    /// Wraps a spawned timer task.
    #[must_use]
    pub fn new(interval: Interval, generation: u64, timer: JoinHandle<()>) -> Self {
        Self {
            interval,
            generation,
            timer,
        }
    }

    /// Returns the tick cadence.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Returns the generation this subscription was installed with.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` once the timer task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    /// Stops the timer. No tick is issued after this returns, apart from one
    /// that had already passed its generation check.
    pub fn cancel(self) {
        self.timer.abort();
    }
}
