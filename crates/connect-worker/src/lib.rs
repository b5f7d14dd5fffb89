//! # connect-worker
//!
//! Scheduled housekeeping: age-based notification archival and
//! per-principal overflow trimming.

pub mod archiver;
pub mod scheduler;

pub use archiver::NotificationArchiver;
pub use scheduler::HousekeepingScheduler;
