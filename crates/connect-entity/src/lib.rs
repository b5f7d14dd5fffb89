//! # connect-entity
//!
//! Domain entity models for BCET Connect: notifications, feed posts, and
//! the read-only user profile shape consumed by the feed engine.

pub mod feed;
pub mod notification;
pub mod user;

pub use feed::{FeedCategory, FeedPost, MediaAttachment, NewFeedPost, PostComment, Visibility};
pub use notification::{NewNotification, Notification, NotificationCategory, NotificationPriority};
pub use user::{UserProfile, UserRole};
