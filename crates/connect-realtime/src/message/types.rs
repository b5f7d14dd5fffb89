//! Inbound and outbound message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use connect_entity::notification::{Notification, NotificationPriority};

/// Messages sent by the client over its channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Mark a single notification as read.
    MarkRead {
        /// Notification ID.
        notification_id: Uuid,
    },
    /// Mark every notification as read.
    MarkAllRead,
    /// Pong response to server keepalive.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Events pushed by the server to live channels.
///
/// Each event carries the minimal payload the client needs to update
/// local state without a follow-up fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Registration acknowledged.
    Connected {
        /// The principal this channel was registered for.
        principal_id: Uuid,
    },
    /// A new notification was persisted for this principal.
    NotificationNew {
        /// The full formatted record.
        notification: Notification,
    },
    /// One notification transitioned to read.
    NotificationRead {
        /// Notification ID.
        id: Uuid,
    },
    /// Every notification transitioned to read.
    NotificationsAllRead,
    /// Role-wide announcement (durable copies are stored per recipient).
    Announcement {
        /// Title.
        title: String,
        /// Body text.
        message: Option<String>,
        /// Priority level.
        priority: NotificationPriority,
        /// When the announcement was issued.
        timestamp: DateTime<Utc>,
    },
    /// Error raised while handling a client message.
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}
