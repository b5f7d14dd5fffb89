//! WebSocket upgrade handler — authenticates, registers a delivery
//! channel, and services the live connection.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{info, warn};

use connect_realtime::connection::authenticator::AuthenticatedChannel;
use connect_realtime::connection::handle::ChannelHandle;
use connect_realtime::message::types::{ClientMessage, ServerEvent};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade.
///
/// The credential is verified *before* the upgrade completes; an invalid
/// or missing token refuses the connection with a 401.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let auth = state.realtime.authenticator.authenticate(&query.token)?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, auth, socket)))
}

/// Services an established WebSocket connection.
async fn handle_ws_connection(state: AppState, auth: AuthenticatedChannel, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state
        .realtime
        .registry
        .register(auth.principal_id, auth.role);
    let channel_id = handle.id;

    info!(
        channel_id = %channel_id,
        principal_id = %auth.principal_id,
        "WebSocket connection established"
    );

    // Registration acknowledgment goes only to this channel.
    send_event(
        &handle,
        &ServerEvent::Connected {
            principal_id: auth.principal_id,
        },
    );

    // Forward queued events to the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Process inbound messages.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_client_message(&state, &auth, &handle, text.as_str()).await;
            }
            Ok(Message::Close(_)) => {
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(channel_id = %channel_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Cleanup.
    outbound_task.abort();
    state.realtime.registry.unregister(&channel_id);

    info!(
        channel_id = %channel_id,
        principal_id = %auth.principal_id,
        "WebSocket connection closed"
    );
}

/// Handles one inbound client message.
async fn handle_client_message(
    state: &AppState,
    auth: &AuthenticatedChannel,
    handle: &ChannelHandle,
    raw: &str,
) {
    let msg: ClientMessage = match serde_json::from_str(raw) {
        Ok(m) => m,
        Err(e) => {
            send_event(
                handle,
                &ServerEvent::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: format!("Failed to parse message: {e}"),
                },
            );
            return;
        }
    };

    match msg {
        ClientMessage::MarkRead { notification_id } => {
            if let Err(e) = state
                .notification_service
                .mark_read(auth.principal_id, notification_id)
                .await
            {
                send_event(
                    handle,
                    &ServerEvent::Error {
                        code: "MARK_READ_FAILED".to_string(),
                        message: e.message,
                    },
                );
            }
        }
        ClientMessage::MarkAllRead => {
            if let Err(e) = state
                .notification_service
                .mark_all_read(auth.principal_id)
                .await
            {
                send_event(
                    handle,
                    &ServerEvent::Error {
                        code: "MARK_ALL_READ_FAILED".to_string(),
                        message: e.message,
                    },
                );
            }
        }
        ClientMessage::Pong { .. } => {}
    }
}

/// Serializes an event onto one channel, ignoring delivery failure.
fn send_event(handle: &ChannelHandle, event: &ServerEvent) {
    if let Ok(msg) = serde_json::to_string(event) {
        handle.send(msg);
    }
}
