//! Connection DTOs for the inspection endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ConnectionSummary;

/// One live connection.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionDto {
    /// Connection identifier.
    pub connection_id: uuid::Uuid,
    /// Admission timestamp.
    pub connected_at: DateTime<Utc>,
    /// `"subscribed"` or `"idle"`.
    pub state: String,
    /// Interval of the running timer, if subscribed.
    pub interval_ms: Option<u64>,
}

impl From<ConnectionSummary> for ConnectionDto {
    fn from(summary: ConnectionSummary) -> Self {
        let state = if summary.interval_ms.is_some() {
            "subscribed"
        } else {
            "idle"
        };
        Self {
            connection_id: *summary.connection_id.as_uuid(),
            connected_at: summary.connected_at,
            state: state.to_string(),
            interval_ms: summary.interval_ms,
        }
    }
}

/// Response body for `GET /api/v1/connections`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionListResponse {
    /// Live connections, oldest first.
    pub data: Vec<ConnectionDto>,
    /// Number of entries in `data`.
    pub total: usize,
}
