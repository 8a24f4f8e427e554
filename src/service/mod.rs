//! Service layer: timer subscription orchestration.
//!
//! [`TimerPublisher`] starts and stops per-connection timers and pushes
//! their ticks into the connections held by the
//! [`super::domain::ConnectionRegistry`].

pub mod timer_publisher;

pub use timer_publisher::TimerPublisher;
