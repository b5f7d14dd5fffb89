//! Concrete PostgreSQL repository implementations.

pub mod feed;
pub mod notification;
pub mod user;

pub use feed::FeedRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;
