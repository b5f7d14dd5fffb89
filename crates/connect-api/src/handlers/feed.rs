//! Feed handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use connect_core::error::AppError;
use connect_core::types::pagination::PageResponse;
use connect_entity::feed::{FeedCategory, FeedPost, NewFeedPost};
use connect_service::feed::service::LikeOutcome;

use crate::dto::request::{CommentRequest, CreatePostRequest, UpdatePostRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Filter parameters for the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedFilter {
    /// Category filter or `"ALL"`.
    #[serde(default, alias = "type")]
    pub category: Option<String>,
}

impl FeedFilter {
    /// Parses the category filter; `"ALL"` (any case) or absence means no
    /// filter.
    fn category_filter(&self) -> Result<Option<FeedCategory>, AppError> {
        match self.category.as_deref() {
            None => Ok(None),
            Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

/// GET /api/feed
pub async fn get_feed(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<FeedFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<FeedPost>>>, ApiError> {
    let category = filter.category_filter()?;

    let feed = state
        .feed_service
        .get_feed(auth.principal_id, category, pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(feed)))
}

/// GET /api/feed/{id}
pub async fn get_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FeedPost>>, ApiError> {
    let post = state.feed_service.get_post(auth.principal_id, id).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// POST /api/feed
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<ApiResponse<FeedPost>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let new = NewFeedPost {
        author_id: auth.principal_id,
        category: req.category,
        body: req.body,
        media: req.media,
        community_id: req.community_id,
        ref_id: req.ref_id,
        visibility: req.visibility,
    };

    let post = state.feed_service.create_post(auth.context(), new).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// PUT /api/feed/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<ApiResponse<FeedPost>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let post = state
        .feed_service
        .update_post(auth.context(), id, req.body, req.visibility)
        .await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// DELETE /api/feed/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.feed_service.delete_post(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Post deleted".to_string(),
    })))
}

/// POST /api/feed/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LikeOutcome>>, ApiError> {
    let outcome = state.feed_service.toggle_like(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/feed/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<ApiResponse<FeedPost>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let post = state
        .feed_service
        .add_comment(auth.context(), id, req.text)
        .await?;
    Ok(Json(ApiResponse::ok(post)))
}
