//! Cron scheduler for periodic housekeeping.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::info;

use connect_core::config::housekeeping::HousekeepingConfig;
use connect_core::error::AppError;

use crate::archiver::NotificationArchiver;

/// Cron-based scheduler wrapping the archival task.
pub struct HousekeepingScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
}

impl std::fmt::Debug for HousekeepingScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HousekeepingScheduler").finish()
    }
}

impl HousekeepingScheduler {
    /// Creates a scheduler with the archival task registered on the
    /// configured cron expression.
    pub async fn new(
        config: &HousekeepingConfig,
        archiver: Arc<NotificationArchiver>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        let job = CronJob::new_async(config.schedule.as_str(), move |_uuid, _lock| {
            let archiver = Arc::clone(&archiver);
            Box::pin(async move {
                archiver.run_logged().await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create archival schedule: {e}")))?;

        scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to register archival task: {e}")))?;

        info!(schedule = %config.schedule, "Archival task registered");
        Ok(Self { scheduler })
    }

    /// Starts the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Housekeeping scheduler started");
        Ok(())
    }

    /// Shuts down the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Housekeeping scheduler shut down");
        Ok(())
    }
}
