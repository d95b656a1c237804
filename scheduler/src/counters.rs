use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Minimal counters for operational visibility.
#[derive(Clone, Default, Debug)]
pub struct ScanCounters {
    pub scans_completed: Arc<AtomicU64>,
    pub scans_failed: Arc<AtomicU64>,
    pub scans_skipped: Arc<AtomicU64>,
    pub samples_written: Arc<AtomicU64>,
}

/// Point-in-time copy of [`ScanCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub scans_completed: u64,
    pub scans_failed: u64,
    pub scans_skipped: u64,
    pub samples_written: u64,
}

impl ScanCounters {
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            scans_completed: self.scans_completed.load(Ordering::Relaxed),
            scans_failed: self.scans_failed.load(Ordering::Relaxed),
            scans_skipped: self.scans_skipped.load(Ordering::Relaxed),
            samples_written: self.samples_written.load(Ordering::Relaxed),
        }
    }
}
