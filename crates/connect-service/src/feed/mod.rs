//! Feed visibility engine and post lifecycle.

pub mod service;
pub mod visibility;

pub use service::FeedService;
pub use visibility::VisibilityRules;
