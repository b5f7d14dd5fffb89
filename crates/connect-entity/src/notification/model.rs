//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::category::NotificationCategory;
use super::priority::NotificationPriority;

/// A durable notification addressed to a single principal.
///
/// Records are immutable after creation except for the read/dismiss/archive
/// transitions and deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient principal.
    pub recipient_id: Uuid,
    /// The principal who triggered the action (if applicable).
    pub actor_id: Option<Uuid>,
    /// Notification category.
    pub category: NotificationCategory,
    /// Short title shown in the list.
    pub title: String,
    /// Longer body text.
    pub message: Option<String>,
    /// Frontend route or absolute URL to open on click.
    pub redirect_url: Option<String>,
    /// Arbitrary structured payload, opaque to this service.
    pub payload: Option<serde_json::Value>,
    /// Priority level.
    pub priority: NotificationPriority,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was first read.
    pub read_at: Option<DateTime<Utc>>,
    /// Whether the recipient dismissed it from the UI.
    pub is_dismissed: bool,
    /// Whether housekeeping has archived it.
    pub is_archived: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check whether the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// Parameters for creating a notification.
///
/// Everything except the recipient and title is optional; defaults match a
/// plain unread notification of normal priority.
#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    /// The recipient principal (required).
    pub recipient_id: Uuid,
    /// The acting principal, when the notification was user-triggered.
    pub actor_id: Option<Uuid>,
    /// Category; defaults to [`NotificationCategory::Generic`].
    pub category: Option<NotificationCategory>,
    /// Short title (required, non-empty).
    pub title: String,
    /// Longer body text.
    pub message: Option<String>,
    /// Redirect target.
    pub redirect_url: Option<String>,
    /// Opaque structured payload.
    pub payload: Option<serde_json::Value>,
    /// Priority; defaults to normal.
    pub priority: Option<NotificationPriority>,
}
