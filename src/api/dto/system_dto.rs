//! System endpoint DTOs: health and runtime statistics.

use serde::Serialize;
use utoipa::ToSchema;

/// Health check response for `GET /health`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` while the server answers.
    pub status: String,
    /// Server time (RFC 3339).
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Runtime counters for `GET /stats`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Live WebSocket connections.
    pub connections: usize,
    /// Connections with a running timer.
    pub subscriptions: usize,
    /// Largest accepted subscription interval in milliseconds.
    pub max_interval_ms: u64,
}
