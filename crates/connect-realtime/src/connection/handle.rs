//! Individual live channel handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use connect_entity::user::UserRole;

/// Unique channel identifier.
pub type ChannelId = Uuid;

/// A handle to a single live channel (one WebSocket connection).
///
/// Holds the sender half of the outbound queue plus the identity the
/// channel was registered under. A principal may hold many handles at once
/// (multiple tabs/devices); each handle's lifetime is bound to its
/// connection.
#[derive(Debug)]
pub struct ChannelHandle {
    /// Unique channel ID.
    pub id: ChannelId,
    /// Principal who owns this channel.
    pub principal_id: Uuid,
    /// Principal's role at registration time.
    pub role: UserRole,
    /// Sender for serialized outbound events.
    sender: mpsc::Sender<String>,
    /// When the channel was registered.
    pub connected_at: DateTime<Utc>,
    /// Whether the channel is still alive.
    alive: AtomicBool,
}

impl ChannelHandle {
    /// Create a new channel handle.
    pub fn new(principal_id: Uuid, role: UserRole, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            principal_id,
            role,
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue a serialized event on this channel.
    ///
    /// Never blocks: a full buffer drops the event (the durable record
    /// still reaches the client on its next fetch), and a closed receiver
    /// marks the channel dead.
    pub fn send(&self, msg: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(channel_id = %self.id, "Channel send buffer full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Check if the channel is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the channel as closed.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
