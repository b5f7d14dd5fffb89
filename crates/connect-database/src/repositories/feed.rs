//! Feed post repository implementation.
//!
//! The visibility `WHERE` clause mirrors `VisibilityRules` in the service
//! layer; the two must stay in sync. Note the own-author escape hatch in
//! the category restriction: a viewer's own posts are never filtered out,
//! whatever category they ask for.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use connect_core::error::{AppError, ErrorKind};
use connect_core::result::AppResult;
use connect_entity::feed::{FeedPost, PostComment, Visibility};

use crate::store::{FeedQuery, FeedStore};

/// PostgreSQL-backed feed store.
#[derive(Debug, Clone)]
pub struct FeedRepository {
    pool: PgPool,
}

impl FeedRepository {
    /// Create a new feed repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Shared visibility predicate used by both the page and count queries.
///
/// Binds: $1 viewer, $2 following, $3 communities, $4 category filter.
const VISIBLE_WHERE: &str = "is_deleted = FALSE AND (\
        author_id = $1 \
        OR category = 'admin_broadcast' \
        OR (visibility = 'followers_only' AND author_id = ANY($2)) \
        OR (visibility = 'community_only' AND community_id = ANY($3)) \
        OR visibility = 'public'\
     ) \
     AND ($4::feed_category IS NULL OR category = $4 OR author_id = $1)";

#[async_trait]
impl FeedStore for FeedRepository {
    async fn insert(&self, post: FeedPost) -> AppResult<FeedPost> {
        sqlx::query_as::<_, FeedPost>(
            "INSERT INTO feed_posts \
             (id, author_id, category, body, media, community_id, ref_id, visibility, \
              likes, comments, is_pinned, is_deleted, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING *",
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(post.category)
        .bind(&post.body)
        .bind(&post.media)
        .bind(post.community_id)
        .bind(post.ref_id)
        .bind(post.visibility)
        .bind(&post.likes)
        .bind(&post.comments)
        .bind(post.is_pinned)
        .bind(post.is_deleted)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))
    }

    async fn find_visible(&self, query: &FeedQuery) -> AppResult<Vec<FeedPost>> {
        let sql = format!(
            "SELECT * FROM feed_posts WHERE {VISIBLE_WHERE} \
             ORDER BY is_pinned DESC, created_at DESC LIMIT $5 OFFSET $6"
        );

        sqlx::query_as::<_, FeedPost>(&sql)
            .bind(query.viewer_id)
            .bind(&query.following)
            .bind(&query.communities)
            .bind(query.category)
            .bind(query.page.limit() as i64)
            .bind(query.page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to query feed", e))
    }

    async fn count_visible(&self, query: &FeedQuery) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM feed_posts WHERE {VISIBLE_WHERE}");

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(query.viewer_id)
            .bind(&query.following)
            .bind(&query.communities)
            .bind(query.category)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count feed", e))?;
        Ok(count as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FeedPost>> {
        sqlx::query_as::<_, FeedPost>(
            "SELECT * FROM feed_posts WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch post", e))
    }

    async fn update_content(
        &self,
        id: Uuid,
        body: Option<String>,
        visibility: Option<Visibility>,
    ) -> AppResult<Option<FeedPost>> {
        sqlx::query_as::<_, FeedPost>(
            "UPDATE feed_posts \
             SET body = COALESCE($2, body), visibility = COALESCE($3, visibility) \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING *",
        )
        .bind(id)
        .bind(body)
        .bind(visibility)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update post", e))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE feed_posts SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete post", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, id: Uuid, principal_id: Uuid) -> AppResult<Option<FeedPost>> {
        // The NOT-ANY guard enforces at-most-one-like atomically.
        sqlx::query_as::<_, FeedPost>(
            "UPDATE feed_posts SET likes = array_append(likes, $2) \
             WHERE id = $1 AND is_deleted = FALSE AND NOT ($2 = ANY(likes)) \
             RETURNING *",
        )
        .bind(id)
        .bind(principal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add like", e))
    }

    async fn remove_like(&self, id: Uuid, principal_id: Uuid) -> AppResult<Option<FeedPost>> {
        sqlx::query_as::<_, FeedPost>(
            "UPDATE feed_posts SET likes = array_remove(likes, $2) \
             WHERE id = $1 AND is_deleted = FALSE AND $2 = ANY(likes) \
             RETURNING *",
        )
        .bind(id)
        .bind(principal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove like", e))
    }

    async fn add_comment(&self, id: Uuid, comment: &PostComment) -> AppResult<Option<FeedPost>> {
        let comment_json = serde_json::to_value(comment)
            .map_err(|e| AppError::with_source(ErrorKind::Serialization, "Invalid comment", e))?;

        sqlx::query_as::<_, FeedPost>(
            "UPDATE feed_posts SET comments = comments || $2::jsonb \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING *",
        )
        .bind(id)
        .bind(comment_json)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add comment", e))
    }
}
