//! Feed post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-exported so callers constructing posts need no direct sqlx dependency.
pub use sqlx::types::Json;

use super::category::FeedCategory;
use super::visibility::Visibility;

/// Kind of a media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
}

/// A provider-hosted media attachment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Attachment kind.
    pub kind: MediaKind,
    /// Public URL served to clients.
    pub url: String,
    /// Provider-assigned asset identifier, used for cleanup.
    pub asset_id: Option<String>,
}

/// A comment embedded in a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostComment {
    /// The commenting principal.
    pub author_id: Uuid,
    /// Comment text.
    pub text: String,
    /// When the comment was added.
    pub created_at: DateTime<Utc>,
}

/// A feed post.
///
/// Likes and comments are embedded collections mutated only through atomic
/// single-row updates; a principal appears in `likes` at most once. Posts
/// are never hard-deleted: `is_deleted` excludes them from every query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedPost {
    /// Unique post identifier.
    pub id: Uuid,
    /// The authoring principal.
    pub author_id: Uuid,
    /// Post category.
    pub category: FeedCategory,
    /// Text body.
    pub body: Option<String>,
    /// Ordered media attachments.
    pub media: Json<Vec<MediaAttachment>>,
    /// Community the post belongs to, when category is community-scoped.
    pub community_id: Option<Uuid>,
    /// External reference (job id, event id) for teaser cards.
    pub ref_id: Option<Uuid>,
    /// Visibility mode.
    pub visibility: Visibility,
    /// Principals who liked the post.
    pub likes: Vec<Uuid>,
    /// Embedded comments, oldest first.
    pub comments: Json<Vec<PostComment>>,
    /// Pinned posts sort before everything else.
    pub is_pinned: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
}

impl FeedPost {
    /// Number of likes on the post.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Whether the given principal has liked the post.
    pub fn liked_by(&self, principal_id: Uuid) -> bool {
        self.likes.contains(&principal_id)
    }
}

/// Parameters for creating a feed post.
#[derive(Debug, Clone, Default)]
pub struct NewFeedPost {
    /// The authoring principal.
    pub author_id: Uuid,
    /// Category; defaults to [`FeedCategory::Personal`].
    pub category: Option<FeedCategory>,
    /// Text body.
    pub body: Option<String>,
    /// Media attachments.
    pub media: Vec<MediaAttachment>,
    /// Community reference.
    pub community_id: Option<Uuid>,
    /// External reference id.
    pub ref_id: Option<Uuid>,
    /// Visibility; defaults to followers-only.
    pub visibility: Option<Visibility>,
}
