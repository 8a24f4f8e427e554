//! Timer publisher: per-connection subscribe/publish protocol.

use std::sync::{Arc, Weak};

use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};

use crate::domain::{
    Clock, ConnectionEntry, ConnectionId, ConnectionRegistry, Delivery, Interval, OutboundEvent,
    Subscription, TimerEvent,
};
use crate::error::GatewayError;

/// Starts, restarts and stops the repeating timer of each connection.
///
/// Holds the [`ConnectionRegistry`] for state. Every subscribe follows the
/// pattern: lock the connection entry → bump its generation → spawn the
/// timer task → install the subscription, cancelling the one it replaces.
#[derive(Debug, Clone)]
pub struct TimerPublisher {
    registry: Arc<ConnectionRegistry>,
    clock: Clock,
    max_interval_ms: u64,
}

impl TimerPublisher {
    /// Creates a publisher over `registry` accepting intervals up to
    /// `max_interval_ms`.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>, max_interval_ms: u64) -> Self {
        Self {
            registry,
            clock: Clock::new(),
            max_interval_ms,
        }
    }

    /// Returns a reference to the inner [`ConnectionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Returns the largest accepted interval in milliseconds.
    #[must_use]
    pub const fn max_interval_ms(&self) -> u64 {
        self.max_interval_ms
    }

    /// Validates a raw interval from the wire, then subscribes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInterval`] if `interval_ms` is not in
    /// `1..=max_interval_ms`; no timer is started in that case. Returns
    /// [`GatewayError::ConnectionNotFound`] if the connection is gone.
    pub async fn subscribe_millis(
        &self,
        id: ConnectionId,
        interval_ms: i64,
    ) -> Result<Interval, GatewayError> {
        let interval = Interval::from_millis(interval_ms, self.max_interval_ms)?;
        self.subscribe(id, interval).await?;
        Ok(interval)
    }

    /// Starts the connection's timer, replacing any timer already running.
    ///
    /// The first tick fires one full `interval` after this call.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConnectionNotFound`] if the connection is not
    /// registered or has already been closed.
    pub async fn subscribe(&self, id: ConnectionId, interval: Interval) -> Result<(), GatewayError> {
        let entry_lock = self.registry.get(id).await?;
        let mut entry = entry_lock.lock().await;
        if !entry.is_open() {
            return Err(GatewayError::ConnectionNotFound(*id.as_uuid()));
        }

        let generation = entry.next_generation();
        let timer = tokio::spawn(run_timer(TimerTask {
            id,
            generation,
            interval,
            clock: self.clock,
            entry: Arc::clone(&entry_lock),
            registry: Arc::downgrade(&self.registry),
        }));
        let replaced = entry.replace_subscription(Subscription::new(interval, generation, timer));

        tracing::info!(
            connection_id = %id,
            interval_ms = interval.as_millis(),
            replaced,
            "timer subscribed"
        );
        Ok(())
    }

    /// Stops the connection's timer, if any.
    ///
    /// Returns `true` if a timer was cancelled. Unknown connections are a
    /// no-op.
    pub async fn unsubscribe(&self, id: ConnectionId) -> bool {
        let Ok(entry_lock) = self.registry.get(id).await else {
            return false;
        };
        let cancelled = entry_lock.lock().await.cancel_subscription();
        if cancelled {
            tracing::info!(connection_id = %id, "timer unsubscribed");
        }
        cancelled
    }
}

/// Everything a running timer needs, moved into its task.
struct TimerTask {
    id: ConnectionId,
    generation: u64,
    interval: Interval,
    clock: Clock,
    entry: Arc<Mutex<ConnectionEntry>>,
    registry: Weak<ConnectionRegistry>,
}

async fn run_timer(task: TimerTask) {
    let period = task.interval.as_duration();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let event = OutboundEvent::Timer(TimerEvent::new(task.clock.now()));

        let mut entry = task.entry.lock().await;
        if !entry.is_current(task.generation) {
            return;
        }
        match entry.try_deliver(event) {
            Ok(Delivery::Sent) => {}
            Ok(Delivery::Dropped) => {
                tracing::debug!(connection_id = %task.id, "outbound buffer full, tick dropped");
            }
            Err(err) => {
                entry.close_from_timer();
                drop(entry);
                tracing::debug!(connection_id = %task.id, error = %err, "delivery failed, closing connection");
                if let Some(registry) = task.registry.upgrade() {
                    registry.disconnect(task.id).await;
                }
                return;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::domain::Connection;

    fn make_publisher() -> TimerPublisher {
        TimerPublisher::new(Arc::new(ConnectionRegistry::new(64)), 60_000)
    }

    fn drain(conn: &mut Connection) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(OutboundEvent::Timer(event)) = conn.try_recv() {
            events.push(event);
        }
        events
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_one_event_per_interval() {
        let publisher = make_publisher();
        let mut conn = publisher.registry().connect().await;
        assert_ok!(publisher.subscribe_millis(conn.id(), 1000).await);

        sleep_ms(3500).await;
        let events = drain(&mut conn);
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn timestamps_advance_by_interval() {
        let publisher = make_publisher();
        let mut conn = publisher.registry().connect().await;
        assert_ok!(publisher.subscribe_millis(conn.id(), 250).await);

        sleep_ms(1010).await;
        let events = drain(&mut conn);
        assert_eq!(events.len(), 4);
        for pair in events.windows(2) {
            let gap = pair[1].timestamp() - pair[0].timestamp();
            assert_eq!(gap, chrono::TimeDelta::milliseconds(250));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn resubscribe_replaces_previous_timer() {
        let publisher = make_publisher();
        let mut conn = publisher.registry().connect().await;
        assert_ok!(publisher.subscribe_millis(conn.id(), 1000).await);

        sleep_ms(500).await;
        assert_ok!(publisher.subscribe_millis(conn.id(), 300).await);

        // The 1000ms timer would have fired at t=1000; only the 300ms
        // cadence (t=800, 1100, 1400) may show up.
        sleep_ms(1000).await;
        let events = drain(&mut conn);
        assert_eq!(events.len(), 3);
        for pair in events.windows(2) {
            let gap = pair[1].timestamp() - pair[0].timestamp();
            assert_eq!(gap, chrono::TimeDelta::milliseconds(300));
        }

        let Ok(entry) = publisher.registry().get(conn.id()).await else {
            panic!("connection should be live");
        };
        let entry = entry.lock().await;
        let interval = entry.subscription().map(|s| s.interval().as_millis());
        assert_eq!(interval, Some(300));
    }

    #[tokio::test(start_paused = true)]
    async fn no_delivery_after_disconnect() {
        let publisher = make_publisher();
        let mut conn = publisher.registry().connect().await;
        assert_ok!(publisher.subscribe_millis(conn.id(), 500).await);

        sleep_ms(600).await;
        assert_eq!(drain(&mut conn).len(), 1);

        assert!(publisher.registry().disconnect(conn.id()).await);
        sleep_ms(1000).await;
        assert!(drain(&mut conn).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_interval_starts_nothing() {
        let publisher = make_publisher();
        let mut conn = publisher.registry().connect().await;

        for bad in [0, -1, -1000, 60_001] {
            let result = publisher.subscribe_millis(conn.id(), bad).await;
            assert!(matches!(result, Err(GatewayError::InvalidInterval(_))));
        }

        sleep_ms(5000).await;
        assert!(drain(&mut conn).is_empty());
        assert_eq!(publisher.registry().subscription_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_resubscribe_keeps_running_timer() {
        let publisher = make_publisher();
        let mut conn = publisher.registry().connect().await;
        assert_ok!(publisher.subscribe_millis(conn.id(), 100).await);
        assert_err!(publisher.subscribe_millis(conn.id(), 0).await);

        sleep_ms(350).await;
        assert_eq!(drain(&mut conn).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn connections_keep_their_own_cadence() {
        let publisher = make_publisher();
        let mut fast = publisher.registry().connect().await;
        let mut slow = publisher.registry().connect().await;
        assert_ok!(publisher.subscribe_millis(fast.id(), 100).await);
        assert_ok!(publisher.subscribe_millis(slow.id(), 400).await);

        sleep_ms(1050).await;
        assert_eq!(drain(&mut fast).len(), 10);
        assert_eq!(drain(&mut slow).len(), 2);
        assert_eq!(publisher.registry().subscription_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribe_stops_timer_and_is_idempotent() {
        let publisher = make_publisher();
        let mut conn = publisher.registry().connect().await;
        assert_ok!(publisher.subscribe_millis(conn.id(), 200).await);

        sleep_ms(450).await;
        assert!(publisher.unsubscribe(conn.id()).await);
        assert!(!publisher.unsubscribe(conn.id()).await);
        assert!(!publisher.unsubscribe(ConnectionId::new()).await);

        sleep_ms(1000).await;
        assert_eq!(drain(&mut conn).len(), 2);
        assert!(publisher.registry().contains(conn.id()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_transport_counts_as_disconnect() {
        let publisher = make_publisher();
        let conn = publisher.registry().connect().await;
        let id = conn.id();
        assert_ok!(publisher.subscribe_millis(id, 100).await);

        drop(conn);
        sleep_ms(150).await;
        assert!(!publisher.registry().contains(id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn full_buffer_drops_ticks() {
        let publisher = TimerPublisher::new(Arc::new(ConnectionRegistry::new(2)), 60_000);
        let mut conn = publisher.registry().connect().await;
        assert_ok!(publisher.subscribe_millis(conn.id(), 100).await);

        sleep_ms(1050).await;
        assert_eq!(drain(&mut conn).len(), 2);
        assert!(publisher.registry().contains(conn.id()).await);
    }

    #[tokio::test]
    async fn subscribe_unknown_connection_fails() {
        let publisher = make_publisher();
        let result = publisher.subscribe_millis(ConnectionId::new(), 1000).await;
        assert!(matches!(result, Err(GatewayError::ConnectionNotFound(_))));
    }
}
