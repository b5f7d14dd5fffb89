//! Notification category enumeration.

use serde::{Deserialize, Serialize};

/// Category of a notification for client-side grouping and icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// A followed author published new content.
    ContentUpdate,
    /// Someone reacted to the recipient's content.
    Reaction,
    /// Someone commented on the recipient's content.
    Comment,
    /// Admin broadcast announcement.
    Broadcast,
    /// System-level notifications.
    System,
    /// Anything that does not fit the other categories.
    Generic,
}

impl NotificationCategory {
    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentUpdate => "content_update",
            Self::Reaction => "reaction",
            Self::Comment => "comment",
            Self::Broadcast => "broadcast",
            Self::System => "system",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
