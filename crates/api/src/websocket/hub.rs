//! Realtime hub
//!
//! Owns every piece of realtime state (connections, rooms, presence) for this
//! process. Handlers receive it through application state rather than
//! reaching for globals, so a shared backing store can replace it later.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::connection::Connection;
use super::events::{DeliveredMessage, Sender, ServerEvent, TypingNotice};
use super::presence::PresenceTracker;
use super::room::{RoomId, RoomManager};
use super::session::EventError;
use crate::config::Config;

/// Tunables for the hub
#[derive(Debug, Clone, Copy)]
pub struct HubSettings {
    /// Upper bound on relayed message content, in bytes
    pub max_message_bytes: usize,
    /// Emit `presence-offline` when a user's last session closes
    pub broadcast_offline_presence: bool,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            max_message_bytes: 4096,
            broadcast_offline_presence: true,
        }
    }
}

impl From<&Config> for HubSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_message_bytes: config.max_message_bytes,
            broadcast_offline_presence: config.broadcast_offline_presence,
        }
    }
}

/// Realtime state shared across all connections
#[derive(Clone)]
pub struct RealtimeHub {
    /// All active connections indexed by session_id
    connections: Arc<RwLock<HashMap<Uuid, Arc<Connection>>>>,
    rooms: Arc<RoomManager>,
    presence: Arc<PresenceTracker>,
    settings: HubSettings,
}

impl RealtimeHub {
    pub fn new(settings: HubSettings) -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            rooms: Arc::new(RoomManager::new()),
            presence: Arc::new(PresenceTracker::new()),
            settings,
        }
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// Register an authenticated connection
    ///
    /// Acknowledges the connection and sends the current presence snapshot
    /// before it is reachable by any broadcast, joins it to its private room
    /// and tells everyone else the user is online.
    pub async fn connect(&self, conn: Connection) -> Arc<Connection> {
        let conn = Arc::new(conn);
        let session_id = conn.session_id();
        let user_id = conn.user_id();

        // Held until the announcement is queued
        let mut presence = self.presence.transition().await;
        presence.mark_online(user_id, session_id);

        let _ = conn.send(ServerEvent::Connected { session_id, user_id });
        let _ = conn.send(ServerEvent::PresenceList(presence.online_users()));

        self.join(&conn, RoomId::User(user_id)).await;

        {
            let mut connections = self.connections.write().await;
            connections.insert(session_id, Arc::clone(&conn));

            tracing::info!(
                session_id = %session_id,
                user_id = %user_id,
                total_connections = connections.len(),
                "WebSocket connection added"
            );
        }

        self.broadcast_all(ServerEvent::PresenceOnline(user_id), Some(&session_id))
            .await;

        conn
    }

    /// Tear down a connection
    ///
    /// Removes it from the rooms it joined and from presence. Returns false if
    /// the session was already gone.
    pub async fn disconnect(&self, session_id: &Uuid) -> bool {
        let conn = {
            let mut connections = self.connections.write().await;
            let Some(conn) = connections.remove(session_id) else {
                return false;
            };

            tracing::info!(
                session_id = %session_id,
                user_id = %conn.user_id(),
                remaining_connections = connections.len(),
                "WebSocket connection removed"
            );
            conn
        };

        let joined = conn.joined_rooms().await;
        self.rooms.remove_connection(session_id, &joined).await;

        let user_id = conn.user_id();

        // Held until the announcement is queued
        let mut presence = self.presence.transition().await;
        if presence.mark_offline(user_id, *session_id) {
            if self.settings.broadcast_offline_presence {
                self.broadcast_all(ServerEvent::PresenceOffline(user_id), None).await;
            } else {
                tracing::debug!(user_id = %user_id, "User offline, broadcast disabled");
            }
        }

        true
    }

    /// Add a connection to a room; idempotent
    pub async fn join(&self, conn: &Arc<Connection>, room: RoomId) -> bool {
        conn.track_room(room.clone()).await;
        self.rooms.join(room, Arc::clone(conn)).await
    }

    /// Remove a connection from a room; idempotent
    pub async fn leave(&self, conn: &Connection, room: &RoomId) -> bool {
        conn.untrack_room(room).await;
        self.rooms.leave(room, &conn.session_id()).await
    }

    /// Relay a message to every member of a room, sender included
    ///
    /// Returns the number of connections reached.
    pub async fn relay(
        &self,
        conn: &Connection,
        room: &RoomId,
        content: String,
    ) -> Result<usize, EventError> {
        if content.trim().is_empty() {
            return Err(EventError::EmptyMessage);
        }
        if content.len() > self.settings.max_message_bytes {
            return Err(EventError::MessageTooLarge {
                limit: self.settings.max_message_bytes,
            });
        }

        let event = ServerEvent::MessageDelivered(DeliveredMessage {
            sender: Sender::from(conn.user()),
            content,
            room_id: room.to_string(),
            room_kind: room.kind(),
        });

        Ok(self.rooms.broadcast(room, event).await)
    }

    /// Tell the other members of a room that this user started or stopped
    /// typing. Nothing is scheduled: a start is never followed by an
    /// automatic stop.
    pub async fn notify_typing(&self, conn: &Connection, room: &RoomId, typing: bool) -> usize {
        let notice = TypingNotice {
            room_id: room.to_string(),
            user_id: conn.user_id(),
        };
        let event = if typing {
            ServerEvent::TypingStart(notice)
        } else {
            ServerEvent::TypingStop(notice)
        };

        self.rooms
            .broadcast_except(room, event, &conn.session_id())
            .await
    }

    /// Deliver an event to every session of one user through their private room
    pub async fn send_to_user(&self, user_id: Uuid, event: ServerEvent) -> usize {
        self.rooms.broadcast(&RoomId::User(user_id), event).await
    }

    /// Fan an event out to every connection, optionally skipping one session
    pub async fn broadcast_all(&self, event: ServerEvent, exclude: Option<&Uuid>) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;

        for conn in connections.values() {
            if exclude == Some(&conn.session_id()) {
                continue;
            }
            if conn.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }

        tracing::debug!(event = event.name(), recipients = delivered, "Broadcast event to all");
        delivered
    }

    /// Get total number of active connections
    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }

    /// Get statistics about the realtime state
    pub async fn get_stats(&self) -> RealtimeStats {
        RealtimeStats {
            active_connections: self.connection_count().await,
            active_rooms: self.rooms.get_room_count().await,
            online_users: self.presence.online_count().await,
        }
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new(HubSettings::default())
    }
}

/// Statistics about realtime connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealtimeStats {
    pub active_connections: usize,
    pub active_rooms: usize,
    pub online_users: usize,
}
