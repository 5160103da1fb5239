//! Shared application state

use linkup_shared::{PgUserStore, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    auth::{Authenticator, JwtManager},
    config::Config,
    websocket::{HubSettings, RealtimeHub},
};

/// State handed to every route
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub jwt_manager: Arc<JwtManager>,
    pub authenticator: Authenticator,
    pub hub: RealtimeHub,
}

impl AppState {
    /// Build state backed by the PostgreSQL user store
    pub fn new(config: Config, pool: PgPool) -> Self {
        let users = Arc::new(PgUserStore::new(pool.clone()));
        Self::with_user_store(config, pool, users)
    }

    /// Build state with an explicit user store
    pub fn with_user_store(config: Config, pool: PgPool, users: Arc<dyn UserStore>) -> Self {
        let jwt_manager = Arc::new(JwtManager::new(
            &config.access_token_secret,
            config.access_token_expiry_hours,
        ));
        let authenticator = Authenticator::new(Arc::clone(&jwt_manager), users);
        let hub = RealtimeHub::new(HubSettings::from(&config));

        Self {
            config: Arc::new(config),
            pool,
            jwt_manager,
            authenticator,
            hub,
        }
    }
}
