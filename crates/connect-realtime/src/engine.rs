//! Top-level real-time engine facade.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use connect_auth::jwt::JwtDecoder;
use connect_core::config::realtime::RealtimeConfig;
use connect_core::error::AppError;

use crate::connection::authenticator::WsAuthenticator;
use crate::connection::registry::DeliveryRegistry;

/// Bundles the delivery registry with registration authentication and a
/// shutdown signal, constructed once at startup and injected wherever a
/// push capability is needed.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// The delivery registry.
    pub registry: Arc<DeliveryRegistry>,
    /// Registration authenticator.
    pub authenticator: WsAuthenticator,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new engine.
    pub fn new(config: RealtimeConfig, decoder: Arc<JwtDecoder>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let registry = Arc::new(DeliveryRegistry::new(config));

        info!("Real-time engine initialized");

        Self {
            registry,
            authenticator: WsAuthenticator::new(decoder),
            shutdown_tx,
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown: signals listeners and closes every
    /// live channel.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.registry.close_all();

        info!("Real-time engine shut down");
        Ok(())
    }
}
