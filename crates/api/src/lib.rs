//! Linkup realtime API library
//!
//! This crate contains the WebSocket presence and messaging server for Linkup.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
