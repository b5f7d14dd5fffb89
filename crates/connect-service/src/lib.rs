//! # connect-service
//!
//! Business logic for the notification/feed delivery path: the
//! notification service (durable creation with fan-out-on-create), its
//! convenience producers, the feed visibility engine, and best-effort
//! media cleanup.

pub mod context;
pub mod feed;
pub mod media;
pub mod notification;

pub use context::RequestContext;
pub use feed::service::{FeedService, LikeOutcome};
pub use feed::visibility::VisibilityRules;
pub use media::MediaPurger;
pub use notification::producers::BroadcastAudience;
pub use notification::service::{NotificationList, NotificationService};
