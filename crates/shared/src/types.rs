//! Common types used across Linkup

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

// =============================================================================
// Users
// =============================================================================

/// User record as seen by the realtime layer
///
/// Credentials (password hash, refresh token) are never selected into this
/// type, so it is safe to attach to a connection and share with peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_name: String,
    pub full_name: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub is_banned: bool,
}

impl UserProfile {
    /// Build a minimal profile, mostly useful for tests and seeding
    pub fn new(id: Uuid, user_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            user_name: user_name.into(),
            full_name: None,
            email: email.into(),
            avatar: None,
            role: UserRole::default(),
            is_banned: false,
        }
    }
}
