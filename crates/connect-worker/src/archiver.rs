//! Notification archival task.
//!
//! Archives (never deletes) old notifications so the hot set stays small;
//! archived records drop out of every list and count query but remain
//! recoverable.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info};

use connect_core::result::AppResult;
use connect_database::store::NotificationStore;

/// Runs the age-based and overflow archival passes.
#[derive(Clone)]
pub struct NotificationArchiver {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
    /// Archive notifications older than this many days.
    archive_after_days: i64,
    /// Keep at most this many live notifications per principal.
    max_stored_per_principal: i64,
}

impl std::fmt::Debug for NotificationArchiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationArchiver")
            .field("archive_after_days", &self.archive_after_days)
            .field("max_stored_per_principal", &self.max_stored_per_principal)
            .finish()
    }
}

impl NotificationArchiver {
    /// Creates a new archiver.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        archive_after_days: i64,
        max_stored_per_principal: i64,
    ) -> Self {
        Self {
            store,
            archive_after_days,
            max_stored_per_principal,
        }
    }

    /// Runs one archival pass; returns (aged, overflow) counts.
    pub async fn run_once(&self) -> AppResult<(u64, u64)> {
        let cutoff = Utc::now() - Duration::days(self.archive_after_days);

        let aged = self.store.archive_older_than(None, cutoff).await?;
        let overflow = self
            .store
            .archive_overflow(self.max_stored_per_principal)
            .await?;

        info!(
            aged,
            overflow,
            cutoff_days = self.archive_after_days,
            "Notification archival pass complete"
        );
        Ok((aged, overflow))
    }

    /// Runs a pass, logging instead of propagating failures (the next
    /// scheduled run will retry).
    pub async fn run_logged(&self) {
        if let Err(e) = self.run_once().await {
            error!(error = %e, "Notification archival pass failed");
        }
    }
}
