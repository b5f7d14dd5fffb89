//! BCET Connect — campus network notification/feed delivery service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use connect_core::config::AppConfig;
use connect_core::error::AppError;
use connect_database::store::{FeedStore, NotificationStore, ProfileStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CONNECT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting BCET Connect v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    tracing::info!("Connecting to database...");
    let db = connect_database::connection::DatabasePool::connect(&config.database).await?;
    let db_pool = db.into_pool();

    connect_database::migration::run_migrations(&db_pool).await?;

    // ── Repositories ─────────────────────────────────────────────
    let notification_store: Arc<dyn NotificationStore> = Arc::new(
        connect_database::repositories::NotificationRepository::new(db_pool.clone()),
    );
    let feed_store: Arc<dyn FeedStore> = Arc::new(
        connect_database::repositories::FeedRepository::new(db_pool.clone()),
    );
    let profile_store: Arc<dyn ProfileStore> = Arc::new(
        connect_database::repositories::UserRepository::new(db_pool.clone()),
    );

    // ── Auth ─────────────────────────────────────────────────────
    let jwt_decoder = Arc::new(connect_auth::jwt::JwtDecoder::new(&config.auth));

    // ── Realtime engine ──────────────────────────────────────────
    let realtime = Arc::new(connect_realtime::engine::RealtimeEngine::new(
        config.realtime.clone(),
        Arc::clone(&jwt_decoder),
    ));

    // ── Services ─────────────────────────────────────────────────
    let notification_service = Arc::new(connect_service::NotificationService::new(
        Arc::clone(&notification_store),
        Arc::clone(&profile_store),
        Arc::clone(&realtime.registry),
    ));

    let media_purger = Arc::new(connect_service::MediaPurger::new(config.media.clone()));

    let feed_service = Arc::new(connect_service::FeedService::new(
        Arc::clone(&feed_store),
        Arc::clone(&profile_store),
        Arc::clone(&notification_service),
        Arc::clone(&media_purger),
    ));

    tracing::info!("Services initialized");

    // ── Housekeeping worker ──────────────────────────────────────
    let mut scheduler = if config.housekeeping.enabled {
        let archiver = Arc::new(connect_worker::NotificationArchiver::new(
            Arc::clone(&notification_store),
            config.housekeeping.archive_after_days as i64,
            config.housekeeping.max_stored_per_principal as i64,
        ));

        let scheduler =
            connect_worker::HousekeepingScheduler::new(&config.housekeeping, archiver).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Housekeeping worker disabled");
        None
    };

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = connect_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        jwt_decoder,
        realtime: Arc::clone(&realtime),
        notification_service,
        feed_service,
    };

    let app = connect_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("BCET Connect listening on {addr}");

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Teardown ─────────────────────────────────────────────────
    realtime.shutdown().await?;
    if let Some(ref mut scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    db_pool.close().await;

    tracing::info!("BCET Connect shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
