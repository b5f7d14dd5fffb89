//! The delivery registry — live channels indexed by principal and by role.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use connect_core::config::realtime::RealtimeConfig;
use connect_entity::user::UserRole;

use crate::message::types::ServerEvent;

use super::handle::{ChannelHandle, ChannelId};

/// Tracks every live channel, grouped by principal identity and by role,
/// and fans events out to all channels matching a target.
///
/// This is the only shared mutable state in the delivery path. All three
/// indexes support concurrent registration/unregistration from many
/// connection lifecycle events; every mutation is single-key.
///
/// Constructed explicitly and passed by handle — deliberately not a
/// process-wide singleton, so tests can build their own and tear it down.
#[derive(Debug)]
pub struct DeliveryRegistry {
    /// Channel ID → handle, for direct lookup and unregistration.
    by_id: DashMap<ChannelId, Arc<ChannelHandle>>,
    /// Principal ID → that principal's live channels.
    by_principal: DashMap<Uuid, Vec<Arc<ChannelHandle>>>,
    /// Role → live channels registered under that role.
    by_role: DashMap<UserRole, Vec<Arc<ChannelHandle>>>,
    /// Configuration.
    config: RealtimeConfig,
}

impl DeliveryRegistry {
    /// Creates an empty registry.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            by_id: DashMap::new(),
            by_principal: DashMap::new(),
            by_role: DashMap::new(),
            config,
        }
    }

    /// Registers a new channel for an authenticated principal.
    ///
    /// Returns the handle and the receiver half of its outbound queue.
    /// When the principal is at their channel limit, the oldest channel is
    /// closed and replaced.
    pub fn register(
        &self,
        principal_id: Uuid,
        role: UserRole,
    ) -> (Arc<ChannelHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ChannelHandle::new(principal_id, role, tx));

        let existing = self.channels_for_principal(&principal_id);
        if existing.len() >= self.config.max_channels_per_principal {
            warn!(
                principal_id = %principal_id,
                count = existing.len(),
                max = self.config.max_channels_per_principal,
                "Principal at max channels, oldest will be replaced"
            );
            if let Some(oldest) = existing.first() {
                oldest.mark_closed();
                self.unregister(&oldest.id);
            }
        }

        self.insert(handle.clone());

        info!(
            channel_id = %handle.id,
            principal_id = %principal_id,
            role = %handle.role,
            "Channel registered"
        );

        (handle, rx)
    }

    /// Adds a prebuilt handle to all indexes. Idempotent: registering the
    /// same handle twice is a no-op.
    fn insert(&self, handle: Arc<ChannelHandle>) {
        if self.by_id.contains_key(&handle.id) {
            return;
        }
        self.by_id.insert(handle.id, handle.clone());
        self.by_principal
            .entry(handle.principal_id)
            .or_default()
            .push(handle.clone());
        self.by_role.entry(handle.role).or_default().push(handle);
    }

    /// Unregisters a channel from every index. No-op if the ID is unknown.
    pub fn unregister(&self, channel_id: &ChannelId) -> Option<Arc<ChannelHandle>> {
        let (_, handle) = self.by_id.remove(channel_id)?;
        handle.mark_closed();

        if let Some(mut channels) = self.by_principal.get_mut(&handle.principal_id) {
            channels.retain(|c| c.id != *channel_id);
            if channels.is_empty() {
                drop(channels);
                self.by_principal.remove(&handle.principal_id);
            }
        }
        if let Some(mut channels) = self.by_role.get_mut(&handle.role) {
            channels.retain(|c| c.id != *channel_id);
            if channels.is_empty() {
                drop(channels);
                self.by_role.remove(&handle.role);
            }
        }

        info!(
            channel_id = %channel_id,
            principal_id = %handle.principal_id,
            "Channel unregistered"
        );
        Some(handle)
    }

    /// Delivers an event to every live channel of one principal.
    ///
    /// Returns the number of channels reached. Zero is not an error: the
    /// durable record is unaffected by live delivery.
    pub fn push_to_principal(&self, principal_id: Uuid, event: &ServerEvent) -> usize {
        let channels = self.channels_for_principal(&principal_id);
        if channels.is_empty() {
            return 0;
        }
        self.fan_out(&channels, event)
    }

    /// Delivers an event to every live channel registered under a role.
    pub fn push_to_role(&self, role: UserRole, event: &ServerEvent) -> usize {
        let channels = self
            .by_role
            .get(&role)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        if channels.is_empty() {
            return 0;
        }
        self.fan_out(&channels, event)
    }

    /// Serializes the event once and sends it to each channel.
    fn fan_out(&self, channels: &[Arc<ChannelHandle>], event: &ServerEvent) -> usize {
        let msg = match serde_json::to_string(event) {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "Failed to serialize outbound event");
                return 0;
            }
        };

        let mut reached = 0;
        for channel in channels {
            if channel.send(msg.clone()) {
                reached += 1;
            } else {
                debug!(channel_id = %channel.id, "Skipped dead or saturated channel");
            }
        }
        reached
    }

    /// Gets all live channels for a principal.
    fn channels_for_principal(&self, principal_id: &Uuid) -> Vec<Arc<ChannelHandle>> {
        self.by_principal
            .get(principal_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Checks if a principal has at least one live channel.
    pub fn is_principal_connected(&self, principal_id: &Uuid) -> bool {
        self.by_principal.contains_key(principal_id)
    }

    /// Returns the total channel count.
    pub fn channel_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns the number of distinct connected principals.
    pub fn principal_count(&self) -> usize {
        self.by_principal.len()
    }

    /// Closes and removes every channel.
    pub fn close_all(&self) {
        let ids: Vec<ChannelId> = self.by_id.iter().map(|entry| *entry.key()).collect();
        for id in &ids {
            self.unregister(id);
        }
        if !ids.is_empty() {
            info!(count = ids.len(), "All channels closed");
        }
    }
}
