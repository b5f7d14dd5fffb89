//! Notification service — durable creation with fan-out-on-create, plus
//! retrieval and read-state transitions.
//!
//! Durability precedes liveness everywhere: a record is persisted first,
//! and the push to live channels is best-effort. A client that misses a
//! push observes the same state on its next list/unread-count fetch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use connect_core::error::AppError;
use connect_core::result::AppResult;
use connect_core::types::pagination::PageRequest;
use connect_database::store::{NotificationStore, ProfileStore};
use connect_entity::notification::{NewNotification, Notification, NotificationCategory};
use connect_realtime::connection::registry::DeliveryRegistry;
use connect_realtime::message::types::ServerEvent;

/// One page of a principal's notifications plus the counters the client
/// renders next to the bell icon.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationList {
    /// Notifications on this page, newest first.
    pub items: Vec<Notification>,
    /// Total matching notifications across all pages.
    pub total: u64,
    /// Current page (1-based).
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Current unread count (independent of the page filter).
    pub unread_count: u64,
}

/// Manages durable notifications and owns the fan-out-on-create policy.
#[derive(Clone)]
pub struct NotificationService {
    /// Durable store.
    store: Arc<dyn NotificationStore>,
    /// Profile store, used to resolve broadcast audiences.
    pub(crate) profiles: Arc<dyn ProfileStore>,
    /// Live delivery registry.
    pub(crate) registry: Arc<DeliveryRegistry>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        profiles: Arc<dyn ProfileStore>,
        registry: Arc<DeliveryRegistry>,
    ) -> Self {
        Self {
            store,
            profiles,
            registry,
        }
    }

    /// Returns the delivery registry this service pushes through.
    pub fn registry(&self) -> &Arc<DeliveryRegistry> {
        &self.registry
    }

    /// Creates a notification and pushes it to the recipient's live
    /// channels.
    ///
    /// The push happens only after the record is durable and can never
    /// fail the call; zero channels reached is the normal offline case.
    pub async fn create(&self, new: NewNotification) -> AppResult<Notification> {
        let persisted = self.create_silent(new).await?;
        self.push_new(&persisted);
        Ok(persisted)
    }

    /// Creates a notification without pushing (role-wide broadcasts push
    /// once per role instead of once per recipient).
    pub(crate) async fn create_silent(&self, new: NewNotification) -> AppResult<Notification> {
        if new.recipient_id.is_nil() {
            return Err(AppError::validation("Notification recipient is required"));
        }
        if new.title.trim().is_empty() {
            return Err(AppError::validation("Notification title is required"));
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_id: new.recipient_id,
            actor_id: new.actor_id,
            category: new.category.unwrap_or(NotificationCategory::Generic),
            title: new.title,
            message: new.message,
            redirect_url: new.redirect_url,
            payload: new.payload,
            priority: new.priority.unwrap_or_default(),
            is_read: false,
            read_at: None,
            is_dismissed: false,
            is_archived: false,
            created_at: Utc::now(),
        };

        self.store.insert(notification).await
    }

    /// Pushes a freshly persisted notification to the recipient.
    pub(crate) fn push_new(&self, notification: &Notification) {
        let reached = self.registry.push_to_principal(
            notification.recipient_id,
            &ServerEvent::NotificationNew {
                notification: notification.clone(),
            },
        );
        debug!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            reached,
            "Pushed notification to live channels"
        );
    }

    /// Lists a page of the recipient's visible notifications, newest
    /// first, with total and unread counters.
    pub async fn list(
        &self,
        recipient_id: Uuid,
        page: PageRequest,
        only_unread: bool,
    ) -> AppResult<NotificationList> {
        let items = self.store.find_page(recipient_id, &page, only_unread).await?;
        let total = self.store.count(recipient_id, only_unread).await?;
        let unread_count = self.store.count(recipient_id, true).await?;

        Ok(NotificationList {
            items,
            total,
            page: page.page,
            limit: page.page_size,
            unread_count,
        })
    }

    /// Returns the recipient's unread notification count.
    pub async fn unread_count(&self, recipient_id: Uuid) -> AppResult<u64> {
        self.store.count(recipient_id, true).await
    }

    /// Marks one notification as read, scoped to the recipient.
    ///
    /// Idempotent: a second call is a no-op that preserves the original
    /// read timestamp. A notification owned by another principal is
    /// indistinguishable from a missing one.
    pub async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<Notification> {
        let updated = self
            .store
            .mark_read(recipient_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;

        self.registry
            .push_to_principal(recipient_id, &ServerEvent::NotificationRead { id });

        Ok(updated)
    }

    /// Marks every unread notification for the recipient as read.
    pub async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let affected = self.store.mark_all_read(recipient_id).await?;

        self.registry
            .push_to_principal(recipient_id, &ServerEvent::NotificationsAllRead);

        Ok(affected)
    }

    /// Soft-dismisses one notification, scoped to the recipient.
    pub async fn dismiss(&self, recipient_id: Uuid, id: Uuid) -> AppResult<()> {
        if !self.store.dismiss(recipient_id, id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Hard-deletes one notification, scoped to the recipient.
    pub async fn delete(&self, recipient_id: Uuid, id: Uuid) -> AppResult<()> {
        if !self.store.delete(recipient_id, id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Archives the recipient's notifications created before the cutoff.
    pub async fn archive_older_than(
        &self,
        recipient_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.store.archive_older_than(Some(recipient_id), cutoff).await
    }
}
