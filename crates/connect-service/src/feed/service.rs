//! Feed service — the visibility engine plus the post lifecycle that
//! drives the notification path.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use connect_core::error::AppError;
use connect_core::result::AppResult;
use connect_core::types::pagination::{PageRequest, PageResponse};
use connect_database::store::{FeedQuery, FeedStore, ProfileStore};
use connect_entity::feed::model::Json;
use connect_entity::feed::{FeedCategory, FeedPost, NewFeedPost, PostComment, Visibility};

use crate::context::RequestContext;
use crate::media::MediaPurger;
use crate::notification::service::NotificationService;

use super::visibility::VisibilityRules;

/// Result of a like toggle.
#[derive(Debug, Clone, Serialize)]
pub struct LikeOutcome {
    /// Whether the caller now likes the post.
    pub liked: bool,
    /// Total likes after the toggle.
    pub like_count: usize,
}

/// Computes per-viewer feeds and manages the post lifecycle.
#[derive(Clone)]
pub struct FeedService {
    /// Durable post store.
    store: Arc<dyn FeedStore>,
    /// Profile store (viewer relationship sets, follower fan-out).
    profiles: Arc<dyn ProfileStore>,
    /// Notification service for producing actions.
    notifications: Arc<NotificationService>,
    /// Best-effort media cleanup.
    media: Arc<MediaPurger>,
}

impl std::fmt::Debug for FeedService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedService").finish()
    }
}

impl FeedService {
    /// Creates a new feed service.
    pub fn new(
        store: Arc<dyn FeedStore>,
        profiles: Arc<dyn ProfileStore>,
        notifications: Arc<NotificationService>,
        media: Arc<MediaPurger>,
    ) -> Self {
        Self {
            store,
            profiles,
            notifications,
            media,
        }
    }

    /// Resolves the viewer's relationship sets, failing on unknown ids.
    async fn rules_for(&self, viewer_id: Uuid) -> AppResult<VisibilityRules> {
        let profile = self
            .profiles
            .find_by_id(viewer_id)
            .await?
            .ok_or_else(|| AppError::validation("Unknown viewer"))?;
        Ok(VisibilityRules::from_profile(&profile))
    }

    /// Computes the viewer's feed: every post the viewer may see, pinned
    /// first then newest first, paginated.
    ///
    /// The viewer's own posts are always included — even when `category`
    /// is set and does not match — and admin broadcasts are included for
    /// everyone. This is deliberate policy (a user must never lose sight
    /// of their own posts or official announcements).
    pub async fn get_feed(
        &self,
        viewer_id: Uuid,
        category: Option<FeedCategory>,
        page: PageRequest,
    ) -> AppResult<PageResponse<FeedPost>> {
        let rules = self.rules_for(viewer_id).await?;

        let query = FeedQuery {
            viewer_id,
            following: rules.following,
            communities: rules.communities,
            category,
            page: page.clone(),
        };

        let items = self.store.find_visible(&query).await?;
        let total = self.store.count_visible(&query).await?;

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    /// Fetches a single post, applying the same visibility rules as the
    /// feed query. An invisible post is indistinguishable from a missing
    /// one.
    pub async fn get_post(&self, viewer_id: Uuid, post_id: Uuid) -> AppResult<FeedPost> {
        let rules = self.rules_for(viewer_id).await?;

        let post = self
            .store
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if !rules.is_visible(&post) {
            return Err(AppError::not_found("Post not found"));
        }
        Ok(post)
    }

    /// Creates a post and notifies the author's followers.
    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        new: NewFeedPost,
    ) -> AppResult<FeedPost> {
        let body = new.body.map(|b| b.trim().to_string()).filter(|b| !b.is_empty());
        if body.is_none() && new.media.is_empty() {
            return Err(AppError::validation("Post needs text or media"));
        }

        let category = new.category.unwrap_or(FeedCategory::Personal);
        if category == FeedCategory::AdminBroadcast && !ctx.is_admin() {
            return Err(AppError::forbidden("Only admins can post announcements"));
        }

        let visibility = new.visibility.unwrap_or_default();
        if visibility == Visibility::CommunityOnly && new.community_id.is_none() {
            return Err(AppError::validation(
                "Community-only posts need a community",
            ));
        }

        let post = FeedPost {
            id: Uuid::new_v4(),
            author_id: ctx.principal_id,
            category,
            body,
            media: Json(new.media),
            community_id: new.community_id,
            ref_id: new.ref_id,
            visibility,
            likes: Vec::new(),
            comments: Json(Vec::new()),
            is_pinned: false,
            is_deleted: false,
            created_at: Utc::now(),
        };

        let persisted = self.store.insert(post).await?;
        info!(post_id = %persisted.id, author_id = %persisted.author_id, "Post created");

        // Follower fan-out runs detached; a notification failure never
        // affects the created post.
        if persisted.category != FeedCategory::AdminBroadcast {
            self.notify_followers_detached(&persisted);
        }

        Ok(persisted)
    }

    /// Spawns the follower notification fan-out for a new post.
    fn notify_followers_detached(&self, post: &FeedPost) {
        let profiles = Arc::clone(&self.profiles);
        let notifications = Arc::clone(&self.notifications);
        let author_id = post.author_id;
        let post_id = post.id;

        tokio::spawn(async move {
            let followers = match profiles.list_follower_ids(author_id).await {
                Ok(ids) => ids,
                Err(e) => {
                    warn!(author_id = %author_id, error = %e, "Follower lookup failed");
                    return;
                }
            };

            for follower_id in followers {
                if let Err(e) = notifications
                    .notify_post_published(follower_id, author_id, post_id)
                    .await
                {
                    warn!(
                        follower_id = %follower_id,
                        post_id = %post_id,
                        error = %e,
                        "Follower notification failed"
                    );
                }
            }
        });
    }

    /// Updates a post's body and/or visibility. Allowed for the author or
    /// an admin; for anyone else the post does not exist.
    pub async fn update_post(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        body: Option<String>,
        visibility: Option<Visibility>,
    ) -> AppResult<FeedPost> {
        let post = self
            .store
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if post.author_id != ctx.principal_id && !ctx.is_admin() {
            return Err(AppError::not_found("Post not found"));
        }

        let body = body.map(|b| b.trim().to_string()).filter(|b| !b.is_empty());

        self.store
            .update_content(post_id, body, visibility)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Soft-deletes a post and schedules best-effort media cleanup.
    /// Allowed for the author or an admin.
    pub async fn delete_post(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<()> {
        let post = self
            .store
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if post.author_id != ctx.principal_id && !ctx.is_admin() {
            return Err(AppError::not_found("Post not found"));
        }

        if !self.store.soft_delete(post_id).await? {
            return Err(AppError::not_found("Post not found"));
        }

        // The delete has already succeeded; cleanup runs detached.
        self.media.purge_detached(post.media.0.clone());

        info!(post_id = %post_id, deleted_by = %ctx.principal_id, "Post soft-deleted");
        Ok(())
    }

    /// Toggles the caller's like on a post. Liking (not unliking) someone
    /// else's post notifies the author.
    pub async fn toggle_like(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<LikeOutcome> {
        let post = self
            .store
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        let me = ctx.principal_id;
        let liking = !post.liked_by(me);

        let attempted = if liking {
            self.store.add_like(post_id, me).await?
        } else {
            self.store.remove_like(post_id, me).await?
        };

        // A lost race against another toggle leaves the row unchanged;
        // report whatever state the post is actually in.
        let current = match attempted {
            Some(updated) => updated,
            None => self
                .store
                .find_by_id(post_id)
                .await?
                .ok_or_else(|| AppError::not_found("Post not found"))?,
        };

        let liked = current.liked_by(me);
        if liked && liking && current.author_id != me {
            if let Err(e) = self
                .notifications
                .notify_reaction(current.author_id, me, post_id)
                .await
            {
                warn!(post_id = %post_id, error = %e, "Reaction notification failed");
            }
        }

        Ok(LikeOutcome {
            liked,
            like_count: current.like_count(),
        })
    }

    /// Appends a comment. Commenting on someone else's post notifies the
    /// author.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        text: String,
    ) -> AppResult<FeedPost> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(AppError::validation("Comment text required"));
        }

        let comment = PostComment {
            author_id: ctx.principal_id,
            text,
            created_at: Utc::now(),
        };

        let updated = self
            .store
            .add_comment(post_id, &comment)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if updated.author_id != ctx.principal_id {
            if let Err(e) = self
                .notifications
                .notify_comment(updated.author_id, ctx.principal_id, post_id)
                .await
            {
                warn!(post_id = %post_id, error = %e, "Comment notification failed");
            }
        }

        Ok(updated)
    }
}
