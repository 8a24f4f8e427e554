//! WebSocket connection loop.
//!
//! Bridges one socket to the registry: admits the peer, dispatches its
//! commands to the [`TimerPublisher`], writes queued events back, and
//! disconnects it when the socket closes or errors.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::ClientCommand;
use crate::domain::ConnectionId;
use crate::service::TimerPublisher;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards events queued for this connection to the client.
///
/// Transport errors end the loop exactly like a close frame; either way
/// the connection is removed from the registry before returning.
pub async fn run_connection(socket: WebSocket, publisher: Arc<TimerPublisher>) {
    let registry = Arc::clone(publisher.registry());
    let (id, mut outbound) = registry.connect().await.into_parts();
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(text.as_str(), id, &publisher).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(connection_id = %id, error = %err, "ws transport error");
                        break;
                    }
                    _ => {}
                }
            }
            // Event queued by this connection's timer
            event = outbound.recv() => {
                let Some(event) = event else {
                    break;
                };
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(err) => {
                        tracing::warn!(connection_id = %id, error = %err, "failed to encode event");
                        continue;
                    }
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    registry.disconnect(id).await;
    tracing::debug!(connection_id = %id, "ws connection closed");
}

/// Decodes one text frame and applies it to the connection.
///
/// Malformed frames and invalid intervals are logged and otherwise
/// ignored; nothing is reported back to the peer.
pub async fn handle_text_message(text: &str, id: ConnectionId, publisher: &TimerPublisher) {
    match ClientCommand::parse(text) {
        Ok(ClientCommand::SubscribeToTimer { interval_ms }) => {
            if let Err(err) = publisher.subscribe_millis(id, interval_ms).await {
                tracing::debug!(
                    connection_id = %id,
                    code = err.error_code(),
                    error = %err,
                    "subscribe rejected"
                );
            }
        }
        Ok(ClientCommand::UnsubscribeFromTimer) => {
            publisher.unsubscribe(id).await;
        }
        Err(err) => {
            tracing::debug!(
                connection_id = %id,
                code = err.error_code(),
                error = %err,
                "ignoring client frame"
            );
        }
    }
}
