//! Housekeeping worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled notification-archival settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousekeepingConfig {
    /// Whether the housekeeping worker runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the archival schedule.
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Notifications older than this many days are archived.
    #[serde(default = "default_archive_days")]
    pub archive_after_days: u32,
    /// Maximum stored notifications per principal; the oldest beyond this
    /// are archived regardless of age.
    #[serde(default = "default_max_stored")]
    pub max_stored_per_principal: u64,
}

impl Default for HousekeepingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_schedule(),
            archive_after_days: default_archive_days(),
            max_stored_per_principal: default_max_stored(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    // Daily at 03:30 UTC.
    "0 30 3 * * *".to_string()
}

fn default_archive_days() -> u32 {
    30
}

fn default_max_stored() -> u64 {
    1000
}
