//! The feed inclusion predicate.
//!
//! `FeedRepository`'s SQL `WHERE` clause mirrors this predicate exactly;
//! keep the two in sync. The rules live here as plain code so the policy
//! is unit-testable and reusable for single-post access checks.

use uuid::Uuid;

use connect_entity::feed::{FeedCategory, FeedPost, Visibility};
use connect_entity::user::UserProfile;

/// A viewer's resolved relationship sets, evaluated against posts.
///
/// Two overrides are deliberate policy, not filter bugs:
/// * a viewer's own posts are always included, even when a category
///   filter is active and the post's category does not match;
/// * admin broadcasts are included for every viewer.
#[derive(Debug, Clone)]
pub struct VisibilityRules {
    /// The viewing principal.
    pub viewer_id: Uuid,
    /// Principals the viewer follows.
    pub following: Vec<Uuid>,
    /// Communities the viewer belongs to.
    pub communities: Vec<Uuid>,
}

impl VisibilityRules {
    /// Builds the rules from a viewer's profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            viewer_id: profile.id,
            following: profile.following.clone(),
            communities: profile.communities.clone(),
        }
    }

    /// Whether the viewer may see the post at all.
    pub fn is_visible(&self, post: &FeedPost) -> bool {
        if post.is_deleted {
            return false;
        }
        if post.author_id == self.viewer_id {
            return true;
        }
        if post.category == FeedCategory::AdminBroadcast {
            return true;
        }
        match post.visibility {
            Visibility::Public => true,
            Visibility::FollowersOnly => self.following.contains(&post.author_id),
            Visibility::CommunityOnly => post
                .community_id
                .map(|c| self.communities.contains(&c))
                .unwrap_or(false),
        }
    }

    /// Whether the post survives an optional category filter.
    ///
    /// The viewer's own posts pass every filter.
    pub fn passes_category(&self, post: &FeedPost, filter: Option<FeedCategory>) -> bool {
        match filter {
            None => true,
            Some(category) => post.category == category || post.author_id == self.viewer_id,
        }
    }

    /// The full inclusion predicate: visible and matching the filter.
    pub fn includes(&self, post: &FeedPost, filter: Option<FeedCategory>) -> bool {
        self.is_visible(post) && self.passes_category(post, filter)
    }
}
