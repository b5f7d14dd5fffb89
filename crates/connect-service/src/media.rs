//! Best-effort cleanup of provider-hosted media.
//!
//! Deleting a post must succeed whether or not the provider cleanup does;
//! failures are logged and never propagated.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use connect_core::config::media::MediaConfig;
use connect_entity::feed::MediaAttachment;

/// Deletes detached media assets from the external provider.
#[derive(Debug, Clone)]
pub struct MediaPurger {
    /// HTTP client for the provider API.
    client: reqwest::Client,
    /// Provider settings.
    config: MediaConfig,
}

impl MediaPurger {
    /// Creates a new purger.
    pub fn new(config: MediaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Spawns a fire-and-forget cleanup task for the given attachments.
    pub fn purge_detached(self: &Arc<Self>, media: Vec<MediaAttachment>) {
        if media.is_empty() {
            return;
        }
        let purger = Arc::clone(self);
        tokio::spawn(async move {
            purger.purge(&media).await;
        });
    }

    /// Deletes each asset, logging failures individually.
    pub async fn purge(&self, media: &[MediaAttachment]) {
        if !self.config.cleanup_enabled {
            debug!(count = media.len(), "Media cleanup disabled, skipping");
            return;
        }

        for attachment in media {
            let Some(asset_id) = attachment.asset_id.as_deref() else {
                continue;
            };

            let url = format!(
                "{}/{}",
                self.config.delete_endpoint.trim_end_matches('/'),
                asset_id
            );

            let result = self
                .client
                .delete(&url)
                .bearer_auth(&self.config.api_key)
                .send()
                .await;

            match result {
                Ok(resp) if resp.status().is_success() => {
                    debug!(asset_id, "Deleted provider asset");
                }
                Ok(resp) => {
                    warn!(asset_id, status = %resp.status(), "Provider asset delete rejected");
                }
                Err(e) => {
                    warn!(asset_id, error = %e, "Provider asset delete failed");
                }
            }
        }
    }
}
