//! User profile model.
//!
//! The profile store is an external collaborator; this service reads only
//! the fields the feed engine and broadcast producer need.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A campus principal's profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Unique principal identifier.
    pub id: Uuid,
    /// Login/handle name.
    pub username: String,
    /// Display name shown in the UI.
    pub display_name: Option<String>,
    /// Role.
    pub role: UserRole,
    /// Principals this user follows.
    pub following: Vec<Uuid>,
    /// Communities this user belongs to.
    pub communities: Vec<Uuid>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}
