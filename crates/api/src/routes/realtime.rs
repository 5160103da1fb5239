//! Realtime introspection endpoints

use axum::{extract::State, Json};

use crate::{state::AppState, websocket::RealtimeStats};

/// Current connection, room and presence counts for this instance
pub async fn stats(State(state): State<AppState>) -> Json<RealtimeStats> {
    Json(state.hub.get_stats().await)
}
