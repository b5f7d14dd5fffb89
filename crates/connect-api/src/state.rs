//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use connect_auth::jwt::JwtDecoder;
use connect_core::config::AppConfig;
use connect_realtime::engine::RealtimeEngine;
use connect_service::feed::service::FeedService;
use connect_service::notification::service::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool (health checks).
    pub db_pool: PgPool,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Real-time delivery engine.
    pub realtime: Arc<RealtimeEngine>,
    /// Notification service.
    pub notification_service: Arc<NotificationService>,
    /// Feed service.
    pub feed_service: Arc<FeedService>,
}
