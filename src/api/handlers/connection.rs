//! Connection inspection handlers: list and get.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ConnectionDto, ConnectionListResponse};
use crate::app_state::AppState;
use crate::domain::{ConnectionId, ConnectionSummary};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /connections` — List live connections.
#[utoipa::path(
    get,
    path = "/api/v1/connections",
    tag = "Connections",
    summary = "List connections",
    description = "Returns every live WebSocket connection with its subscription state.",
    responses(
        (status = 200, description = "Live connections", body = ConnectionListResponse),
    )
)]
pub async fn list_connections(State(state): State<AppState>) -> impl IntoResponse {
    let data: Vec<ConnectionDto> = state
        .registry
        .list()
        .await
        .into_iter()
        .map(ConnectionDto::from)
        .collect();
    let total = data.len();
    Json(ConnectionListResponse { data, total })
}

/// `GET /connections/:id` — Get one connection.
///
/// # Errors
///
/// Returns [`GatewayError::ConnectionNotFound`] if the connection is not
/// live.
#[utoipa::path(
    get,
    path = "/api/v1/connections/{id}",
    tag = "Connections",
    summary = "Get connection",
    description = "Returns the subscription state of a single live connection.",
    params(
        ("id" = uuid::Uuid, Path, description = "Connection UUID"),
    ),
    responses(
        (status = 200, description = "Connection details", body = ConnectionDto),
        (status = 404, description = "Connection not found", body = ErrorResponse),
    )
)]
pub async fn get_connection(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let entry_lock = state.registry.get(ConnectionId::from(id)).await?;
    let summary = ConnectionSummary::from(&*entry_lock.lock().await);
    Ok(Json(ConnectionDto::from(summary)))
}

/// Connection inspection routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/connections", get(list_connections))
        .route("/connections/{id}", get(get_connection))
}
