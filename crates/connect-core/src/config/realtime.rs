//! Real-time delivery configuration.

use serde::{Deserialize, Serialize};

/// Delivery registry and WebSocket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Maximum simultaneous channels per principal. When exceeded, the
    /// oldest channel is replaced.
    #[serde(default = "default_max_channels_per_principal")]
    pub max_channels_per_principal: usize,
    /// Buffer size of the per-channel outbound queue.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_channels_per_principal: default_max_channels_per_principal(),
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

fn default_max_channels_per_principal() -> usize {
    5
}

fn default_channel_buffer() -> usize {
    256
}
