//! Admin handlers.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use connect_core::error::AppError;
use connect_service::notification::producers::BroadcastAudience;

use crate::dto::request::BroadcastRequest;
use crate::dto::response::{AffectedResponse, ApiResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/admin/broadcast
///
/// Persists a high-priority notification per recipient and pushes to the
/// live audience.
pub async fn broadcast(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BroadcastRequest>,
) -> Result<Json<ApiResponse<AffectedResponse>>, ApiError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Admin role required").into());
    }
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let audience = match req.recipients {
        Some(ids) if !ids.is_empty() => BroadcastAudience::Principals(ids),
        _ if req.target.eq_ignore_ascii_case("all") => BroadcastAudience::All,
        _ => BroadcastAudience::Role(req.target.parse()?),
    };

    let persisted = state
        .notification_service
        .broadcast(
            auth.principal_id,
            audience,
            req.title,
            req.message,
            req.redirect_url,
        )
        .await?;

    Ok(Json(ApiResponse::ok(AffectedResponse {
        affected: persisted,
    })))
}
