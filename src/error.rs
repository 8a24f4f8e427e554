//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Errors on the
//! WebSocket path are scoped to a single connection and only logged; errors
//! on the REST path map to a status code and a structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "connection not found: 6f1c…"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | State/Not Found | 404 Not Found / 410 Gone  |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Subscribe request with a missing, non-positive or oversized interval.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Client frame could not be parsed or names an unknown event.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// No live connection with the given ID.
    #[error("connection not found: {0}")]
    ConnectionNotFound(uuid::Uuid),

    /// An event could not be handed to a connection whose transport is gone.
    #[error("failed to deliver `{event}` to connection {connection_id}")]
    DeliveryFailure {
        /// Target connection.
        connection_id: uuid::Uuid,
        /// Wire name of the undelivered event.
        event: &'static str,
    },
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInterval(_) => 1001,
            Self::MalformedMessage(_) => 1002,
            Self::ConnectionNotFound(_) => 2001,
            Self::DeliveryFailure { .. } => 2002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInterval(_) | Self::MalformedMessage(_) => StatusCode::BAD_REQUEST,
            Self::ConnectionNotFound(_) => StatusCode::NOT_FOUND,
            Self::DeliveryFailure { .. } => StatusCode::GONE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
