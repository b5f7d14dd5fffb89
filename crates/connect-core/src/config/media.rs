//! Media provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external media store used for best-effort cleanup of
/// provider-hosted attachments when a post is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Whether remote media cleanup is enabled.
    #[serde(default)]
    pub cleanup_enabled: bool,
    /// Base URL of the provider's asset-deletion endpoint.
    #[serde(default)]
    pub delete_endpoint: String,
    /// API key sent with deletion requests.
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cleanup_enabled: false,
            delete_endpoint: String::new(),
            api_key: String::new(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
