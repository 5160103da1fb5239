//! Linkup Shared Types and Utilities
//!
//! This crate contains the user model, the user store and database helpers
//! shared across the Linkup realtime services.

pub mod db;
pub mod error;
pub mod types;
pub mod users;

pub use db::*;
pub use error::*;
pub use types::*;
pub use users::{MemoryUserStore, PgUserStore, UserStore};
