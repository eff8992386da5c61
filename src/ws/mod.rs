//! WebSocket layer: handshake, receive loop, and reader → consumer messages.
//!
//! The feed holds exactly one connection. Its reader task is the only
//! producer on the feed channel, which is what keeps events in arrival
//! order.

pub mod connection;
pub mod messages;

pub use connection::{FeedStream, connect, run_connection};
pub use messages::{CloseReason, FeedMessage};
