//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use connect_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted at the boundary and passed into service methods so that every
/// operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated principal's ID.
    pub principal_id: Uuid,
    /// The principal's role at the time the credential was issued.
    pub role: UserRole,
    /// The username (convenience field from the claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(principal_id: Uuid, role: UserRole, username: String) -> Self {
        Self {
            principal_id,
            role,
            username,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
