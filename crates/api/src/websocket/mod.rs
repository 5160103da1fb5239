//! WebSocket support for real-time chat
//!
//! Provides the realtime layer of Linkup:
//! - User presence tracking (online/offline)
//! - Direct and group rooms
//! - Message relay to room members
//! - Typing indicators
//!
//! # Architecture
//!
//! - **Connection**: an authenticated WebSocket connection
//! - **Room**: keyed pub/sub groups for broadcasting events
//! - **Presence**: which users currently hold at least one connection
//! - **Hub**: the service object that owns connections, rooms and presence
//! - **Session**: per-connection state machine and event dispatch
//! - **Handler**: Axum WebSocket route handler
//! - **Events**: type-safe event definitions for client/server communication

pub mod connection;
pub mod events;
pub mod handler;
pub mod hub;
pub mod presence;
pub mod room;
pub mod session;

pub use handler::ws_handler;
pub use hub::{HubSettings, RealtimeHub, RealtimeStats};
pub use session::{EventError, Session, SessionPhase};
