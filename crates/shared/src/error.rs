//! Error types for Linkup

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User store unavailable: {0}")]
    Unavailable(String),
}
