//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use connect_core::error::{AppError, ErrorKind};
use connect_core::result::AppResult;
use connect_core::types::pagination::PageRequest;
use connect_entity::notification::Notification;

use crate::store::NotificationStore;

/// PostgreSQL-backed notification store.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, n: Notification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
             (id, recipient_id, actor_id, category, title, message, redirect_url, payload, \
              priority, is_read, read_at, is_dismissed, is_archived, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING *",
        )
        .bind(n.id)
        .bind(n.recipient_id)
        .bind(n.actor_id)
        .bind(n.category)
        .bind(&n.title)
        .bind(&n.message)
        .bind(&n.redirect_url)
        .bind(&n.payload)
        .bind(n.priority)
        .bind(n.is_read)
        .bind(n.read_at)
        .bind(n.is_dismissed)
        .bind(n.is_archived)
        .bind(n.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn find_page(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
        only_unread: bool,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE recipient_id = $1 AND is_archived = FALSE AND is_dismissed = FALSE \
               AND ($2 = FALSE OR is_read = FALSE) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(recipient_id)
        .bind(only_unread)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn count(&self, recipient_id: Uuid, only_unread: bool) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient_id = $1 AND is_archived = FALSE AND is_dismissed = FALSE \
               AND ($2 = FALSE OR is_read = FALSE)",
        )
        .bind(recipient_id)
        .bind(only_unread)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count notifications", e))?;
        Ok(count as u64)
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<Option<Notification>> {
        // COALESCE keeps the first read timestamp on repeated calls.
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND recipient_id = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn dismiss(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_dismissed = TRUE WHERE id = $1 AND recipient_id = $2",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to dismiss notification", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
                .bind(id)
                .bind(recipient_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn archive_older_than(
        &self,
        recipient_id: Option<Uuid>,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_archived = TRUE \
             WHERE created_at < $1 AND is_archived = FALSE \
               AND ($2::uuid IS NULL OR recipient_id = $2)",
        )
        .bind(cutoff)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to archive notifications", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn archive_overflow(&self, keep: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_archived = TRUE WHERE id IN (\
                SELECT id FROM (\
                    SELECT id, ROW_NUMBER() OVER (\
                        PARTITION BY recipient_id ORDER BY created_at DESC\
                    ) AS r_num \
                    FROM notifications WHERE is_archived = FALSE\
                ) t WHERE t.r_num > $1\
             )",
        )
        .bind(keep)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to trim notifications", e)
        })?;
        Ok(result.rows_affected())
    }
}
