//! WebSocket event types and serialization
//!
//! Frames are JSON objects of the form `{"event": "<name>", "data": <payload>}`.
//! The `event` tag selects the variant, so the enums below double as the
//! event-handler table for a connection.

use linkup_shared::UserProfile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::room::RoomKind;

// =============================================================================
// Client-to-Server Events
// =============================================================================

/// Events sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinDirectRoom { chat_id: String },

    #[serde(rename_all = "camelCase")]
    JoinGroupRoom { group_id: String },

    #[serde(rename_all = "camelCase")]
    LeaveDirectRoom { chat_id: String },

    #[serde(rename_all = "camelCase")]
    LeaveGroupRoom { group_id: String },

    #[serde(rename_all = "camelCase")]
    SendDirectMessage { chat_id: String, message: String },

    #[serde(rename_all = "camelCase")]
    SendGroupMessage { group_id: String, message: String },

    #[serde(rename_all = "camelCase")]
    TypingStart { chat_id: String },

    #[serde(rename_all = "camelCase")]
    TypingStop { chat_id: String },

    /// Heartbeat
    Ping,
}

impl ClientEvent {
    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinDirectRoom { .. } => "join-direct-room",
            Self::JoinGroupRoom { .. } => "join-group-room",
            Self::LeaveDirectRoom { .. } => "leave-direct-room",
            Self::LeaveGroupRoom { .. } => "leave-group-room",
            Self::SendDirectMessage { .. } => "send-direct-message",
            Self::SendGroupMessage { .. } => "send-group-message",
            Self::TypingStart { .. } => "typing-start",
            Self::TypingStop { .. } => "typing-stop",
            Self::Ping => "ping",
        }
    }
}

// =============================================================================
// Server-to-Client Events
// =============================================================================

/// Events sent from server to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Connection acknowledged
    #[serde(rename_all = "camelCase")]
    Connected { session_id: Uuid, user_id: Uuid },

    /// Users online at the time of connecting
    PresenceList(Vec<Uuid>),

    /// A user came online
    PresenceOnline(Uuid),

    /// A user's last connection closed
    PresenceOffline(Uuid),

    /// Message relayed to a room
    MessageDelivered(DeliveredMessage),

    TypingStart(TypingNotice),

    TypingStop(TypingNotice),

    /// Heartbeat response
    Pong,

    /// Rejected event
    Error { message: String },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::PresenceList(_) => "presence-list",
            Self::PresenceOnline(_) => "presence-online",
            Self::PresenceOffline(_) => "presence-offline",
            Self::MessageDelivered(_) => "message-delivered",
            Self::TypingStart(_) => "typing-start",
            Self::TypingStop(_) => "typing-stop",
            Self::Pong => "pong",
            Self::Error { .. } => "error",
        }
    }
}

// =============================================================================
// Event Data Structures
// =============================================================================

/// Public part of the sender's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    pub id: Uuid,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&UserProfile> for Sender {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
            full_name: user.full_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredMessage {
    pub sender: Sender,
    pub content: String,
    pub room_id: String,
    pub room_kind: RoomKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingNotice {
    pub room_id: String,
    pub user_id: Uuid,
}
