//! Notification handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use connect_entity::notification::Notification;
use connect_service::notification::service::NotificationList;

use crate::dto::response::{AffectedResponse, ApiResponse, MessageResponse, UnreadCountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Filter parameters for the notification list.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationFilter {
    /// Restrict to unread notifications.
    #[serde(default, alias = "onlyUnread")]
    pub only_unread: bool,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<NotificationFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<NotificationList>>, ApiError> {
    let result = state
        .notification_service
        .list(
            auth.principal_id,
            pagination.into_page_request(),
            filter.only_unread,
        )
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, ApiError> {
    let count = state
        .notification_service
        .unread_count(auth.principal_id)
        .await?;
    Ok(Json(ApiResponse::ok(UnreadCountResponse {
        unread_count: count,
    })))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let updated = state
        .notification_service
        .mark_read(auth.principal_id, id)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AffectedResponse>>, ApiError> {
    let affected = state
        .notification_service
        .mark_all_read(auth.principal_id)
        .await?;
    Ok(Json(ApiResponse::ok(AffectedResponse { affected })))
}

/// POST /api/notifications/{id}/dismiss
pub async fn dismiss(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .notification_service
        .dismiss(auth.principal_id, id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Notification dismissed".to_string(),
    })))
}

/// DELETE /api/notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .notification_service
        .delete(auth.principal_id, id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Notification deleted".to_string(),
    })))
}
