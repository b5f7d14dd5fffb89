//! Request DTOs.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use connect_entity::feed::{FeedCategory, MediaAttachment, Visibility};

/// POST /api/feed
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Post category (defaults to personal).
    pub category: Option<FeedCategory>,
    /// Text body.
    #[validate(length(max = 5000, message = "Post body too long"))]
    pub body: Option<String>,
    /// Media attachments already uploaded to the provider.
    #[serde(default)]
    pub media: Vec<MediaAttachment>,
    /// Community reference for community-scoped posts.
    pub community_id: Option<Uuid>,
    /// External reference (job/event id) for teaser cards.
    pub ref_id: Option<Uuid>,
    /// Visibility mode (defaults to followers-only).
    pub visibility: Option<Visibility>,
}

/// PUT /api/feed/{id}
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePostRequest {
    /// New text body.
    #[validate(length(max = 5000, message = "Post body too long"))]
    pub body: Option<String>,
    /// New visibility mode.
    pub visibility: Option<Visibility>,
}

/// POST /api/feed/{id}/comments
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentRequest {
    /// Comment text.
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub text: String,
}

/// POST /api/admin/broadcast
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BroadcastRequest {
    /// `"all"`, a role name, or ignored when `recipients` is set.
    #[serde(default = "default_target")]
    pub target: String,
    /// Explicit recipient list (overrides `target`).
    pub recipients: Option<Vec<Uuid>>,
    /// Announcement title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Announcement body.
    #[validate(length(max = 2000, message = "Message too long"))]
    pub message: Option<String>,
    /// Redirect target opened on click.
    pub redirect_url: Option<String>,
}

fn default_target() -> String {
    "all".to_string()
}
