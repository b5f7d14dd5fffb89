//! Feed post entity.

pub mod category;
pub mod model;
pub mod visibility;

pub use category::FeedCategory;
pub use model::{FeedPost, MediaAttachment, MediaKind, NewFeedPost, PostComment};
pub use visibility::Visibility;
