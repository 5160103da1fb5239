//! Room identifiers and membership
//!
//! A room is a named broadcast group. Membership only exists as
//! connection-to-room associations held here; empty rooms are dropped.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::connection::Connection;
use super::events::ServerEvent;
use super::session::EventError;

/// Longest accepted chat or group id
pub const MAX_ROOM_ID_LEN: usize = 128;

const GROUP_PREFIX: &str = "group-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    User,
    Direct,
    Group,
}

/// Room key
///
/// The flavor is part of the key: `Group("g1")` and `Direct("group-g1")`
/// share a display name but are different rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomId {
    /// Private room of a single user, addressed only by the server
    User(Uuid),
    Direct(String),
    Group(String),
}

impl RoomId {
    pub fn direct(chat_id: &str) -> Result<Self, EventError> {
        Ok(Self::Direct(validate_id(chat_id, "chatId")?))
    }

    pub fn group(group_id: &str) -> Result<Self, EventError> {
        Ok(Self::Group(validate_id(group_id, "groupId")?))
    }

    pub fn kind(&self) -> RoomKind {
        match self {
            Self::User(_) => RoomKind::User,
            Self::Direct(_) => RoomKind::Direct,
            Self::Group(_) => RoomKind::Group,
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(user_id) => write!(f, "{user_id}"),
            Self::Direct(chat_id) => f.write_str(chat_id),
            Self::Group(group_id) => write!(f, "{GROUP_PREFIX}{group_id}"),
        }
    }
}

fn validate_id(raw: &str, field: &'static str) -> Result<String, EventError> {
    if raw.trim().is_empty() {
        return Err(EventError::InvalidRoomId { field, reason: "must not be empty" });
    }
    if raw.chars().count() > MAX_ROOM_ID_LEN {
        return Err(EventError::InvalidRoomId { field, reason: "is too long" });
    }
    Ok(raw.to_string())
}

/// Manages rooms for broadcasting events
pub struct RoomManager {
    /// Map of room -> member connections
    rooms: Arc<RwLock<HashMap<RoomId, Vec<Arc<Connection>>>>>,
}

impl RoomManager {
    /// Create a new room manager
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a connection to a room
    ///
    /// Returns false if the connection was already a member.
    pub async fn join(&self, room: RoomId, conn: Arc<Connection>) -> bool {
        let mut rooms = self.rooms.write().await;
        let members = rooms.entry(room.clone()).or_default();

        if members.iter().any(|c| c.session_id() == conn.session_id()) {
            return false;
        }
        members.push(Arc::clone(&conn));

        tracing::debug!(
            room = %room,
            room_kind = ?room.kind(),
            session_id = %conn.session_id(),
            room_size = members.len(),
            "Connection joined room"
        );
        true
    }

    /// Remove a connection from a room
    ///
    /// Returns false if the connection was not a member.
    pub async fn leave(&self, room: &RoomId, session_id: &Uuid) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(members) = rooms.get_mut(room) else {
            return false;
        };

        let before = members.len();
        members.retain(|c| c.session_id() != *session_id);
        let removed = members.len() < before;

        if members.is_empty() {
            rooms.remove(room);
            tracing::debug!(room = %room, "Removed empty room");
        } else if removed {
            tracing::debug!(
                room = %room,
                session_id = %session_id,
                room_size = members.len(),
                "Connection left room"
            );
        }
        removed
    }

    /// Broadcast an event to every connection in a room
    ///
    /// Returns the number of connections the event was handed to. A room
    /// without members is a no-op.
    pub async fn broadcast(&self, room: &RoomId, event: ServerEvent) -> usize {
        self.broadcast_filtered(room, event, None).await
    }

    /// Broadcast an event to every connection in a room except one session
    pub async fn broadcast_except(&self, room: &RoomId, event: ServerEvent, exclude: &Uuid) -> usize {
        self.broadcast_filtered(room, event, Some(exclude)).await
    }

    async fn broadcast_filtered(
        &self,
        room: &RoomId,
        event: ServerEvent,
        exclude: Option<&Uuid>,
    ) -> usize {
        let rooms = self.rooms.read().await;
        let Some(members) = rooms.get(room) else {
            tracing::debug!(room = %room, event = event.name(), "No members in room, dropping event");
            return 0;
        };

        let mut success_count = 0;
        let mut failed_count = 0;

        for conn in members {
            if exclude == Some(&conn.session_id()) {
                continue;
            }
            match conn.send(event.clone()) {
                Ok(()) => success_count += 1,
                Err(_) => {
                    // Closed connections are cleaned up by their own session
                    failed_count += 1;
                    tracing::warn!(
                        session_id = %conn.session_id(),
                        "Failed to send event to connection (likely closed)"
                    );
                }
            }
        }

        tracing::debug!(
            room = %room,
            event = event.name(),
            recipients = success_count,
            failed = failed_count,
            "Broadcast event to room"
        );
        success_count
    }

    /// Remove a connection from the rooms it joined
    pub async fn remove_connection(&self, session_id: &Uuid, joined: &HashSet<RoomId>) -> usize {
        let mut rooms = self.rooms.write().await;
        let mut removed_from = 0;

        for room in joined {
            let Some(members) = rooms.get_mut(room) else {
                continue;
            };
            let before_len = members.len();
            members.retain(|c| c.session_id() != *session_id);
            if members.len() < before_len {
                removed_from += 1;
            }
            if members.is_empty() {
                rooms.remove(room);
            }
        }

        if removed_from > 0 {
            tracing::debug!(
                session_id = %session_id,
                room_count = removed_from,
                "Removed connection from rooms"
            );
        }
        removed_from
    }

    /// Get room size (number of connections)
    pub async fn get_room_size(&self, room: &RoomId) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(room).map(|v| v.len()).unwrap_or(0)
    }

    /// Check whether a session is a member of a room
    pub async fn is_member(&self, room: &RoomId, session_id: &Uuid) -> bool {
        let rooms = self.rooms.read().await;
        rooms
            .get(room)
            .is_some_and(|members| members.iter().any(|c| c.session_id() == *session_id))
    }

    /// Get total number of active rooms
    pub async fn get_room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
