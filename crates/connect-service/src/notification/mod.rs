//! Notification creation, retrieval, state transitions, and producers.

pub mod producers;
pub mod service;

pub use producers::BroadcastAudience;
pub use service::{NotificationList, NotificationService};
