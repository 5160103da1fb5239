//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub cors_origin: Option<String>,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Authentication
    pub access_token_secret: String,
    pub access_token_expiry_hours: i64,

    // Realtime
    pub max_message_bytes: usize,
    pub broadcast_offline_presence: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|origin| !origin.is_empty()),

            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            // Authentication
            access_token_secret: {
                let secret = env::var("ACCESS_TOKEN_SECRET")
                    .map_err(|_| ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;
                if secret.len() < 32 {
                    return Err(ConfigError::WeakSecret(
                        "ACCESS_TOKEN_SECRET must be at least 32 characters",
                    ));
                }
                secret
            },
            access_token_expiry_hours: env::var("ACCESS_TOKEN_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),

            // Realtime
            max_message_bytes: {
                let raw = env::var("MAX_MESSAGE_BYTES").unwrap_or_else(|_| "4096".to_string());
                match raw.parse::<usize>() {
                    Ok(0) | Err(_) => {
                        return Err(ConfigError::Invalid(
                            "MAX_MESSAGE_BYTES must be a positive integer",
                        ))
                    }
                    Ok(limit) => limit,
                }
            },
            broadcast_offline_presence: env::var("BROADCAST_OFFLINE_PRESENCE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
}
