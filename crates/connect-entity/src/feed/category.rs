//! Feed post category enumeration.

use serde::{Deserialize, Serialize};

use connect_core::AppError;

/// Category of a feed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "feed_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeedCategory {
    /// Regular user post.
    Personal,
    /// Post inside a community.
    Community,
    /// Post by a mentor.
    Mentor,
    /// Admin announcement; visible to every viewer.
    AdminBroadcast,
    /// Teaser card linking to a job listing.
    JobTeaser,
    /// Teaser card linking to an event.
    EventTeaser,
}

impl FeedCategory {
    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Community => "community",
            Self::Mentor => "mentor",
            Self::AdminBroadcast => "admin_broadcast",
            Self::JobTeaser => "job_teaser",
            Self::EventTeaser => "event_teaser",
        }
    }
}

impl std::fmt::Display for FeedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FeedCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "community" => Ok(Self::Community),
            "mentor" => Ok(Self::Mentor),
            "admin_broadcast" => Ok(Self::AdminBroadcast),
            "job_teaser" => Ok(Self::JobTeaser),
            "event_teaser" => Ok(Self::EventTeaser),
            _ => Err(AppError::validation(format!(
                "Invalid feed category: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrip() {
        for cat in [
            FeedCategory::Personal,
            FeedCategory::Community,
            FeedCategory::Mentor,
            FeedCategory::AdminBroadcast,
            FeedCategory::JobTeaser,
            FeedCategory::EventTeaser,
        ] {
            assert_eq!(cat.as_str().parse::<FeedCategory>().unwrap(), cat);
        }
        assert!("bogus".parse::<FeedCategory>().is_err());
    }
}
