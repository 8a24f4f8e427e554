//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::ConnectionRegistry;
use crate::service::TimerPublisher;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Timer publisher driving every connection's subscription.
    pub publisher: Arc<TimerPublisher>,
    /// Registry of live connections.
    pub registry: Arc<ConnectionRegistry>,
}

impl AppState {
    /// Wires a fresh registry and publisher together.
    #[must_use]
    pub fn new(outbound_buffer: usize, max_interval_ms: u64) -> Self {
        let registry = Arc::new(ConnectionRegistry::new(outbound_buffer));
        let publisher = Arc::new(TimerPublisher::new(Arc::clone(&registry), max_interval_ms));
        Self {
            publisher,
            registry,
        }
    }
}
