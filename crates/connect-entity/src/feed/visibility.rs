//! Per-post visibility modes.

use serde::{Deserialize, Serialize};

/// Who may see a feed post.
///
/// Two rules override the mode entirely: the author always sees their own
/// posts, and admin broadcasts are visible to everyone.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "post_visibility", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to principals following the author.
    #[default]
    FollowersOnly,
    /// Visible to members of the post's community.
    CommunityOnly,
    /// Visible to every authenticated principal.
    Public,
}

impl Visibility {
    /// Return the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FollowersOnly => "followers_only",
            Self::CommunityOnly => "community_only",
            Self::Public => "public",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
