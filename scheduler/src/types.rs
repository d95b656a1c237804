//! Shared types used by the scheduler subsystem.

use std::time::Duration;

use watchlist::{ScanReport, WatchlistError};

/// Timing knobs for the scan loop.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Fixed interval between scheduled scans. Must be non-zero.
    pub cooldown: Duration,

    /// Wait before the first scan after start.
    pub startup_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(60),
            startup_delay: Duration::from_secs(5),
        }
    }
}

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    Completed(ScanReport),
    Failed(WatchlistError),
    /// A previous scan was still running.
    Skipped,
}

impl TickOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, TickOutcome::Skipped)
    }
}
