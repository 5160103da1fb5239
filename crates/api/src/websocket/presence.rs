//! Presence tracking
//!
//! Maps each online user to the set of their live sessions. A user is online
//! while at least one session is registered.

use std::collections::{HashMap, HashSet};
use tokio::sync::{RwLock, RwLockWriteGuard};
use uuid::Uuid;

type SessionMap = HashMap<Uuid, HashSet<Uuid>>;

#[derive(Default)]
pub struct PresenceTracker {
    sessions: RwLock<SessionMap>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock presence for a transition
    ///
    /// Other transitions wait until the guard is dropped, so a caller that
    /// announces the change before dropping it keeps notices in order.
    pub async fn transition(&self) -> PresenceGuard<'_> {
        PresenceGuard {
            sessions: self.sessions.write().await,
        }
    }

    pub async fn is_online(&self, user_id: &Uuid) -> bool {
        let sessions = self.sessions.read().await;
        sessions.contains_key(user_id)
    }

    pub async fn online_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}

/// Exclusive access to the presence set
pub struct PresenceGuard<'a> {
    sessions: RwLockWriteGuard<'a, SessionMap>,
}

impl PresenceGuard<'_> {
    /// Register a session; returns true if this is the user's first one
    pub fn mark_online(&mut self, user_id: Uuid, session_id: Uuid) -> bool {
        let user_sessions = self.sessions.entry(user_id).or_default();
        let first = user_sessions.is_empty();
        user_sessions.insert(session_id);
        first
    }

    /// Drop a session; returns true if it was the user's last one
    pub fn mark_offline(&mut self, user_id: Uuid, session_id: Uuid) -> bool {
        let Some(user_sessions) = self.sessions.get_mut(&user_id) else {
            return false;
        };

        if !user_sessions.remove(&session_id) {
            return false;
        }
        if user_sessions.is_empty() {
            self.sessions.remove(&user_id);
            return true;
        }
        false
    }

    /// Snapshot of online user ids, sorted for stable output
    pub fn online_users(&self) -> Vec<Uuid> {
        let mut users: Vec<Uuid> = self.sessions.keys().copied().collect();
        users.sort();
        users
    }
}
