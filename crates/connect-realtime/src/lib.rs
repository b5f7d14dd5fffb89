//! # connect-realtime
//!
//! The live delivery registry: tracks the channels (WebSocket connections)
//! each principal currently holds, grouped by principal and by role, and
//! fans a payload out to every live channel for a target.
//!
//! Delivery here is strictly best-effort. The durable notification record
//! is the source of truth; a failed or missed push is recovered by the
//! client's next list/unread-count fetch.

pub mod connection;
pub mod engine;
pub mod message;

pub use connection::handle::{ChannelHandle, ChannelId};
pub use connection::registry::DeliveryRegistry;
pub use engine::RealtimeEngine;
pub use message::types::{ClientMessage, ServerEvent};
