//! WebSocket layer: connection handling and client frame decoding.
//!
//! The WebSocket endpoint at `/ws` accepts `subscribeToTimer` and
//! `unsubscribeFromTimer` events and pushes `timer` events back.

pub mod connection;
pub mod handler;
pub mod messages;
