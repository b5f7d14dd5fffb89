//! Store traits consumed by the service layer.
//!
//! The concrete repositories in this crate implement these traits over
//! PostgreSQL; tests substitute in-memory fakes so service behavior can be
//! exercised without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use connect_core::result::AppResult;
use connect_core::types::pagination::PageRequest;
use connect_entity::feed::{FeedCategory, FeedPost, PostComment, Visibility};
use connect_entity::notification::Notification;
use connect_entity::user::{UserProfile, UserRole};

/// A fully resolved feed query: the viewer's identity and relationship
/// sets plus the requested filter and page.
///
/// The service resolves the viewer's profile into `following`/`communities`
/// before querying, so the store needs no access to the profile store.
#[derive(Debug, Clone)]
pub struct FeedQuery {
    /// The viewing principal.
    pub viewer_id: Uuid,
    /// Principals the viewer follows.
    pub following: Vec<Uuid>,
    /// Communities the viewer belongs to.
    pub communities: Vec<Uuid>,
    /// Optional category restriction (`None` = all categories). The
    /// viewer's own posts are included regardless of this filter.
    pub category: Option<FeedCategory>,
    /// Page to return.
    pub page: PageRequest,
}

/// Durable storage for notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Persist a notification and return the stored row.
    async fn insert(&self, notification: Notification) -> AppResult<Notification>;

    /// List visible (non-archived, non-dismissed) notifications for a
    /// recipient, newest first.
    async fn find_page(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
        only_unread: bool,
    ) -> AppResult<Vec<Notification>>;

    /// Count visible notifications for a recipient.
    async fn count(&self, recipient_id: Uuid, only_unread: bool) -> AppResult<u64>;

    /// Mark one notification as read, scoped to the recipient. Returns the
    /// updated row, or `None` when absent or owned by someone else.
    /// Idempotent: the read timestamp is set only on the first transition.
    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<Option<Notification>>;

    /// Mark every unread notification for the recipient as read; returns
    /// the number of rows affected.
    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Soft-dismiss one notification, scoped to the recipient.
    async fn dismiss(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool>;

    /// Hard-delete one notification, scoped to the recipient.
    async fn delete(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool>;

    /// Archive notifications created before the cutoff. When `recipient_id`
    /// is `None` the archival applies across all principals.
    async fn archive_older_than(
        &self,
        recipient_id: Option<Uuid>,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Archive the oldest notifications beyond `keep` per principal.
    async fn archive_overflow(&self, keep: i64) -> AppResult<u64>;
}

/// Durable storage for feed posts.
#[async_trait]
pub trait FeedStore: Send + Sync + 'static {
    /// Persist a post and return the stored row.
    async fn insert(&self, post: FeedPost) -> AppResult<FeedPost>;

    /// Execute the visibility query: non-deleted posts the viewer may see,
    /// pinned first then newest first, paginated.
    async fn find_visible(&self, query: &FeedQuery) -> AppResult<Vec<FeedPost>>;

    /// Count the posts matching the visibility query.
    async fn count_visible(&self, query: &FeedQuery) -> AppResult<u64>;

    /// Fetch a single non-deleted post.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FeedPost>>;

    /// Update a post's body and/or visibility. Returns the updated row,
    /// or `None` when the post is absent or soft-deleted.
    async fn update_content(
        &self,
        id: Uuid,
        body: Option<String>,
        visibility: Option<Visibility>,
    ) -> AppResult<Option<FeedPost>>;

    /// Soft-delete a post. Returns `false` when already deleted or absent.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;

    /// Atomically add a like. Returns the updated row, or `None` when the
    /// post is absent/deleted or the principal already liked it.
    async fn add_like(&self, id: Uuid, principal_id: Uuid) -> AppResult<Option<FeedPost>>;

    /// Atomically remove a like. Returns the updated row, or `None` when
    /// the post is absent/deleted or the principal had not liked it.
    async fn remove_like(&self, id: Uuid, principal_id: Uuid) -> AppResult<Option<FeedPost>>;

    /// Atomically append a comment. Returns the updated row, or `None`
    /// when the post is absent or deleted.
    async fn add_comment(&self, id: Uuid, comment: &PostComment) -> AppResult<Option<FeedPost>>;
}

/// Read-only access to user profiles (external collaborator).
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    /// Fetch a profile by principal id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>>;

    /// List principal ids following the given author.
    async fn list_follower_ids(&self, author_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// List principal ids holding the given role.
    async fn list_ids_by_role(&self, role: UserRole) -> AppResult<Vec<Uuid>>;

    /// List every principal id.
    async fn list_all_ids(&self) -> AppResult<Vec<Uuid>>;
}
