//! # timer-gateway
//!
//! WebSocket gateway that streams a server-generated timestamp to each
//! connected client at the cadence that client asked for.
//!
//! A client sends `{"event":"subscribeToTimer","data":<ms>}` once and then
//! receives `{"event":"timer","data":"<RFC 3339 timestamp>"}` on every tick
//! of its own timer until it disconnects, unsubscribes, or subscribes again
//! with a new interval.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)          REST Handlers (api/)
//!     │
//!     ├── TimerPublisher (service/)
//!     │
//!     └── ConnectionRegistry (domain/)
//!           └── per-connection entry: outbound channel + Subscription
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod router;
pub mod service;
pub mod ws;
