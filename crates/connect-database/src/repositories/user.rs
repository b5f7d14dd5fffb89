//! User profile repository implementation (read-only).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use connect_core::error::{AppError, ErrorKind};
use connect_core::result::AppResult;
use connect_entity::user::{UserProfile, UserRole};

use crate::store::ProfileStore;

/// PostgreSQL-backed profile store.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch profile", e))
    }

    async fn list_follower_ids(&self, author_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar("SELECT id FROM users WHERE $1 = ANY(following)")
            .bind(author_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list followers", e)
            })
    }

    async fn list_ids_by_role(&self, role: UserRole) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar("SELECT id FROM users WHERE role = $1")
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list users by role", e)
            })
    }

    async fn list_all_ids(&self) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar("SELECT id FROM users")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }
}
