//! Domain layer: connection identity, subscriptions, and the registry.
//!
//! This module contains the server-side model of the timer stream: the
//! connection handle and its registry-side entry, the validated interval,
//! the per-connection subscription record, and the events pushed to peers.

pub mod clock;
pub mod connection;
pub mod connection_id;
pub mod connection_registry;
pub mod interval;
pub mod outbound_event;
pub mod subscription;
pub mod timer_event;

pub use clock::Clock;
pub use connection::{Connection, ConnectionEntry, ConnectionSummary, Delivery};
pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
pub use interval::Interval;
pub use outbound_event::OutboundEvent;
pub use subscription::Subscription;
pub use timer_event::TimerEvent;
