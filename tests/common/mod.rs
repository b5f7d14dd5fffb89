//! Shared test fixtures: in-memory stores standing in for PostgreSQL.
//!
//! The fakes implement the same store traits the repositories do, so the
//! services under test run unmodified.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use connect_core::result::AppResult;
use connect_core::types::pagination::PageRequest;
use connect_database::store::{
    FeedQuery, FeedStore, NotificationStore, ProfileStore,
};
use connect_entity::feed::model::Json;
use connect_entity::feed::{FeedCategory, FeedPost, PostComment, Visibility};
use connect_entity::notification::Notification;
use connect_entity::user::{UserProfile, UserRole};
use connect_realtime::connection::registry::DeliveryRegistry;
use connect_service::{MediaPurger, NotificationService, VisibilityRules};

/// In-memory notification store.
#[derive(Default)]
pub struct InMemoryNotificationStore {
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn visible(n: &Notification, recipient_id: Uuid, only_unread: bool) -> bool {
        n.recipient_id == recipient_id
            && !n.is_archived
            && !n.is_dismissed
            && (!only_unread || !n.is_read)
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert(&self, notification: Notification) -> AppResult<Notification> {
        let mut rows = self.rows.lock().unwrap();
        rows.push(notification.clone());
        Ok(notification)
    }

    async fn find_page(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
        only_unread: bool,
    ) -> AppResult<Vec<Notification>> {
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<Notification> = rows
            .iter()
            .filter(|n| Self::visible(n, recipient_id, only_unread))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count(&self, recipient_id: Uuid, only_unread: bool) -> AppResult<u64> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|n| Self::visible(n, recipient_id, only_unread))
            .count() as u64)
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<Option<Notification>> {
        let mut rows = self.rows.lock().unwrap();
        for n in rows.iter_mut() {
            if n.id == id && n.recipient_id == recipient_id {
                n.is_read = true;
                if n.read_at.is_none() {
                    n.read_at = Some(Utc::now());
                }
                return Ok(Some(n.clone()));
            }
        }
        Ok(None)
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut affected = 0;
        for n in rows.iter_mut() {
            if n.recipient_id == recipient_id && !n.is_read {
                n.is_read = true;
                n.read_at = Some(Utc::now());
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn dismiss(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        for n in rows.iter_mut() {
            if n.id == id && n.recipient_id == recipient_id {
                n.is_dismissed = true;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| !(n.id == id && n.recipient_id == recipient_id));
        Ok(rows.len() < before)
    }

    async fn archive_older_than(
        &self,
        recipient_id: Option<Uuid>,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut affected = 0;
        for n in rows.iter_mut() {
            let scoped = recipient_id.map(|r| n.recipient_id == r).unwrap_or(true);
            if scoped && !n.is_archived && n.created_at < cutoff {
                n.is_archived = true;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn archive_overflow(&self, keep: i64) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut per_recipient: HashMap<Uuid, Vec<usize>> = HashMap::new();
        for (idx, n) in rows.iter().enumerate() {
            if !n.is_archived {
                per_recipient.entry(n.recipient_id).or_default().push(idx);
            }
        }

        let mut affected = 0;
        for (_, mut indexes) in per_recipient {
            indexes.sort_by(|a, b| rows[*b].created_at.cmp(&rows[*a].created_at));
            for idx in indexes.into_iter().skip(keep as usize) {
                rows[idx].is_archived = true;
                affected += 1;
            }
        }
        Ok(affected)
    }
}

/// In-memory profile store.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<Uuid, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, profile: UserProfile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    /// Replaces a profile's following set (for unfollow scenarios).
    pub fn set_following(&self, id: Uuid, following: Vec<Uuid>) {
        if let Some(profile) = self.profiles.lock().unwrap().get_mut(&id) {
            profile.following = following;
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.lock().unwrap().get(&id).cloned())
    }

    async fn list_follower_ids(&self, author_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.following.contains(&author_id))
            .map(|p| p.id)
            .collect())
    }

    async fn list_ids_by_role(&self, role: UserRole) -> AppResult<Vec<Uuid>> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.role == role)
            .map(|p| p.id)
            .collect())
    }

    async fn list_all_ids(&self) -> AppResult<Vec<Uuid>> {
        Ok(self.profiles.lock().unwrap().keys().copied().collect())
    }
}

/// In-memory feed store. The visibility filter reuses `VisibilityRules`,
/// mirroring what the SQL `WHERE` clause does in production.
#[derive(Default)]
pub struct InMemoryFeedStore {
    rows: Mutex<Vec<FeedPost>>,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(&self, query: &FeedQuery) -> Vec<FeedPost> {
        let rules = VisibilityRules {
            viewer_id: query.viewer_id,
            following: query.following.clone(),
            communities: query.communities.clone(),
        };

        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<FeedPost> = rows
            .iter()
            .filter(|p| rules.includes(p, query.category))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then(b.created_at.cmp(&a.created_at))
        });
        matching
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn insert(&self, post: FeedPost) -> AppResult<FeedPost> {
        let mut rows = self.rows.lock().unwrap();
        rows.push(post.clone());
        Ok(post)
    }

    async fn find_visible(&self, query: &FeedQuery) -> AppResult<Vec<FeedPost>> {
        Ok(self
            .matching(query)
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit() as usize)
            .collect())
    }

    async fn count_visible(&self, query: &FeedQuery) -> AppResult<u64> {
        Ok(self.matching(query).len() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FeedPost>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|p| p.id == id && !p.is_deleted).cloned())
    }

    async fn update_content(
        &self,
        id: Uuid,
        body: Option<String>,
        visibility: Option<Visibility>,
    ) -> AppResult<Option<FeedPost>> {
        let mut rows = self.rows.lock().unwrap();
        for p in rows.iter_mut() {
            if p.id == id && !p.is_deleted {
                if let Some(body) = body {
                    p.body = Some(body);
                }
                if let Some(visibility) = visibility {
                    p.visibility = visibility;
                }
                return Ok(Some(p.clone()));
            }
        }
        Ok(None)
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        for p in rows.iter_mut() {
            if p.id == id && !p.is_deleted {
                p.is_deleted = true;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn add_like(&self, id: Uuid, principal_id: Uuid) -> AppResult<Option<FeedPost>> {
        let mut rows = self.rows.lock().unwrap();
        for p in rows.iter_mut() {
            if p.id == id && !p.is_deleted && !p.likes.contains(&principal_id) {
                p.likes.push(principal_id);
                return Ok(Some(p.clone()));
            }
        }
        Ok(None)
    }

    async fn remove_like(&self, id: Uuid, principal_id: Uuid) -> AppResult<Option<FeedPost>> {
        let mut rows = self.rows.lock().unwrap();
        for p in rows.iter_mut() {
            if p.id == id && !p.is_deleted && p.likes.contains(&principal_id) {
                p.likes.retain(|l| *l != principal_id);
                return Ok(Some(p.clone()));
            }
        }
        Ok(None)
    }

    async fn add_comment(&self, id: Uuid, comment: &PostComment) -> AppResult<Option<FeedPost>> {
        let mut rows = self.rows.lock().unwrap();
        for p in rows.iter_mut() {
            if p.id == id && !p.is_deleted {
                p.comments.0.push(comment.clone());
                return Ok(Some(p.clone()));
            }
        }
        Ok(None)
    }
}

/// Builds a profile fixture.
pub fn profile(id: Uuid, role: UserRole) -> UserProfile {
    UserProfile {
        id,
        username: format!("user-{}", &id.to_string()[..8]),
        display_name: None,
        role,
        following: Vec::new(),
        communities: Vec::new(),
        created_at: Utc::now(),
    }
}

/// Builds a post fixture.
pub fn post(author: Uuid, category: FeedCategory, visibility: Visibility) -> FeedPost {
    FeedPost {
        id: Uuid::new_v4(),
        author_id: author,
        category,
        body: Some("hello campus".to_string()),
        media: Json(Vec::new()),
        community_id: None,
        ref_id: None,
        visibility,
        likes: Vec::new(),
        comments: Json(Vec::new()),
        is_pinned: false,
        is_deleted: false,
        created_at: Utc::now(),
    }
}

/// Wires a notification service over in-memory stores and a fresh
/// registry.
pub fn notification_service() -> (
    Arc<NotificationService>,
    Arc<InMemoryNotificationStore>,
    Arc<InMemoryProfileStore>,
    Arc<DeliveryRegistry>,
) {
    let store = Arc::new(InMemoryNotificationStore::new());
    let profiles = Arc::new(InMemoryProfileStore::new());
    let registry = Arc::new(DeliveryRegistry::new(Default::default()));

    let service = Arc::new(NotificationService::new(
        store.clone() as Arc<dyn NotificationStore>,
        profiles.clone() as Arc<dyn ProfileStore>,
        Arc::clone(&registry),
    ));

    (service, store, profiles, registry)
}

/// Wires a feed service over in-memory stores.
pub fn feed_service() -> (
    Arc<connect_service::FeedService>,
    Arc<InMemoryFeedStore>,
    Arc<InMemoryProfileStore>,
    Arc<NotificationService>,
    Arc<DeliveryRegistry>,
) {
    let feed_store = Arc::new(InMemoryFeedStore::new());
    let (notifications, _, profiles, registry) = notification_service();

    let media = Arc::new(MediaPurger::new(Default::default()));
    let service = Arc::new(connect_service::FeedService::new(
        feed_store.clone() as Arc<dyn FeedStore>,
        profiles.clone() as Arc<dyn ProfileStore>,
        Arc::clone(&notifications),
        media,
    ));

    (service, feed_store, profiles, notifications, registry)
}
