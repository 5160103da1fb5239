//! User lookups used by the socket handshake

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::UserProfile;

/// Read access to user profiles
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a live (not soft-deleted) user by id, without credential fields
    async fn find_profile(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError>;
}

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_profile(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, user_name, full_name, email, avatar, role, is_banned
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}

/// In-process user store
///
/// Counts lookups and can be switched into an unavailable state, which makes
/// it the store of choice for handshake tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, UserProfile>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: UserProfile) {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
    }

    pub async fn remove(&self, id: &Uuid) -> Option<UserProfile> {
        let mut users = self.users.write().await;
        users.remove(id)
    }

    /// Number of `find_profile` calls served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_profile(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }

        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }
}
