//! WebSocket connection management
//!
//! Represents an authenticated WebSocket connection with room tracking.

use linkup_shared::UserProfile;
use std::collections::HashSet;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::events::ServerEvent;
use super::room::RoomId;

/// An authenticated WebSocket connection
///
/// The identity is fixed at construction; there is no way to swap it for the
/// lifetime of the connection.
#[derive(Debug)]
pub struct Connection {
    session_id: Uuid,
    user: UserProfile,
    sender: mpsc::UnboundedSender<ServerEvent>,
    /// Rooms this connection has joined
    rooms: RwLock<HashSet<RoomId>>,
}

impl Connection {
    /// Create a new connection with a fresh session id
    pub fn new(user: UserProfile, sender: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user,
            sender,
            rooms: RwLock::new(HashSet::new()),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Send an event to this connection
    ///
    /// Returns Err if the connection is closed
    #[allow(clippy::result_large_err)] // Error type is from tokio mpsc, containing the failed event
    pub fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event)
    }

    /// Record a joined room; false if it was already recorded
    pub async fn track_room(&self, room: RoomId) -> bool {
        let mut rooms = self.rooms.write().await;
        rooms.insert(room)
    }

    /// Forget a room; false if it was not recorded
    pub async fn untrack_room(&self, room: &RoomId) -> bool {
        let mut rooms = self.rooms.write().await;
        rooms.remove(room)
    }

    /// Get all joined rooms
    pub async fn joined_rooms(&self) -> HashSet<RoomId> {
        let rooms = self.rooms.read().await;
        rooms.clone()
    }
}
