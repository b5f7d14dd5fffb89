//! # connect-database
//!
//! PostgreSQL connection management, the store traits consumed by the
//! service layer, and the concrete repository implementations.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{FeedQuery, FeedStore, NotificationStore, ProfileStore};
