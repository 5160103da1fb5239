//! WebSocket handler for Axum
//!
//! Authenticates the upgrade request, then runs one receive loop per
//! connection that feeds text frames into its [`Session`].

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use linkup_shared::UserProfile;
use serde::Deserialize;
use tokio::sync::mpsc;

use super::{events::ServerEvent, session::Session};
use crate::{
    auth::bearer_token,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct WebSocketQuery {
    token: Option<String>,
}

/// WebSocket handler - upgrades HTTP connection to WebSocket
///
/// The token comes from the `token` query parameter, falling back to an
/// `Authorization: Bearer` header. Failed authentication answers 401 and the
/// connection is never upgraded. Authentication runs before the upgrade
/// headers are checked.
pub async fn ws_handler(
    State(app_state): State<AppState>,
    Query(params): Query<WebSocketQuery>,
    headers: HeaderMap,
    ws: Option<WebSocketUpgrade>,
) -> ApiResult<Response> {
    let token = params.token.as_deref().or_else(|| bearer_token(&headers));

    let user = match app_state.authenticator.authenticate(token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "WebSocket auth failed");
            return Err(e.into());
        }
    };

    let Some(ws) = ws else {
        return Err(ApiError::BadRequest("WebSocket upgrade required".to_string()));
    };

    tracing::info!(user_id = %user.id, "WebSocket connection upgrade requested");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, user, app_state)))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, user: UserProfile, app_state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Channel for sending events to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let mut session = Session::open(app_state.hub.clone(), user, tx).await;
    let session_id = session.connection().session_id();
    let user_id = session.connection().user_id();

    // Writer task: drain the channel into the socket
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break; // Connection closed
                    }
                }
                Err(e) => {
                    tracing::error!(error = ?e, "Failed to serialize WebSocket event");
                }
            }
        }
    });

    // Reader loop: one event at a time, in arrival order
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => session.handle_text(&text).await,
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %session_id, "WebSocket close frame received");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Axum answers pings automatically
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(session_id = %session_id, "Ignoring binary frame");
            }
            Err(e) => {
                tracing::info!(session_id = %session_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Cleanup on disconnect
    tracing::info!(session_id = %session_id, user_id = %user_id, "WebSocket connection closing");
    session.close().await;

    send_task.abort();
}
