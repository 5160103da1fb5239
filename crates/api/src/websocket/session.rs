//! Per-connection event dispatch
//!
//! A [`Session`] is the state machine behind one socket: it is created
//! already authenticated, dispatches inbound events one at a time, and ends
//! in `Closed` once the hub has forgotten it. It only talks to a channel and
//! the hub, so it can be driven without a live transport.

use linkup_shared::UserProfile;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::connection::Connection;
use super::events::{ClientEvent, ServerEvent};
use super::hub::RealtimeHub;
use super::room::RoomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Registered with the hub, accepting events
    Active,
    /// Removed from the hub; further events are refused
    Closed,
}

/// Reasons an inbound event is refused
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Invalid event format: {0}")]
    Malformed(String),
    #[error("Invalid {field}: {reason}")]
    InvalidRoomId {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("Message exceeds {limit} bytes")]
    MessageTooLarge { limit: usize },
    #[error("Session is closed")]
    SessionClosed,
}

pub struct Session {
    hub: RealtimeHub,
    conn: Arc<Connection>,
    phase: SessionPhase,
}

impl Session {
    /// Register an authenticated user with the hub
    pub async fn open(
        hub: RealtimeHub,
        user: UserProfile,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) -> Self {
        let conn = hub.connect(Connection::new(user, sender)).await;
        Self {
            hub,
            conn,
            phase: SessionPhase::Active,
        }
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Parse and dispatch one text frame
    ///
    /// Failures are reported to the client as an `error` event and never
    /// escape the receive loop.
    pub async fn handle_text(&mut self, text: &str) {
        let result = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.dispatch(event).await,
            Err(e) => Err(EventError::Malformed(e.to_string())),
        };

        if let Err(err) = result {
            tracing::warn!(
                session_id = %self.conn.session_id(),
                user_id = %self.conn.user_id(),
                error = %err,
                "Rejected client event"
            );
            if !matches!(err, EventError::SessionClosed) {
                let _ = self.conn.send(ServerEvent::Error {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Run a single event to completion
    pub async fn dispatch(&mut self, event: ClientEvent) -> Result<(), EventError> {
        use ClientEvent::*;

        if self.phase == SessionPhase::Closed {
            return Err(EventError::SessionClosed);
        }

        tracing::debug!(
            session_id = %self.conn.session_id(),
            event = event.name(),
            "Dispatching client event"
        );

        match event {
            JoinDirectRoom { chat_id } => {
                self.hub.join(&self.conn, RoomId::direct(&chat_id)?).await;
            }
            JoinGroupRoom { group_id } => {
                self.hub.join(&self.conn, RoomId::group(&group_id)?).await;
            }
            LeaveDirectRoom { chat_id } => {
                self.hub.leave(&self.conn, &RoomId::direct(&chat_id)?).await;
            }
            LeaveGroupRoom { group_id } => {
                self.hub.leave(&self.conn, &RoomId::group(&group_id)?).await;
            }
            SendDirectMessage { chat_id, message } => {
                self.hub
                    .relay(&self.conn, &RoomId::direct(&chat_id)?, message)
                    .await?;
            }
            SendGroupMessage { group_id, message } => {
                self.hub
                    .relay(&self.conn, &RoomId::group(&group_id)?, message)
                    .await?;
            }
            TypingStart { chat_id } => {
                self.hub
                    .notify_typing(&self.conn, &RoomId::direct(&chat_id)?, true)
                    .await;
            }
            TypingStop { chat_id } => {
                self.hub
                    .notify_typing(&self.conn, &RoomId::direct(&chat_id)?, false)
                    .await;
            }
            Ping => {
                let _ = self.conn.send(ServerEvent::Pong);
            }
        }

        Ok(())
    }

    /// Leave the hub; safe to call more than once
    pub async fn close(&mut self) {
        if self.phase == SessionPhase::Closed {
            return;
        }
        self.hub.disconnect(&self.conn.session_id()).await;
        self.phase = SessionPhase::Closed;
    }
}
