//! Periodic price scanning.
//!
//! Calls [`PriceScan::scan`] every cooldown after an initial startup delay.
//! At most one scan runs at a time; ticks that land while a scan is in
//! flight are skipped and counted.

pub mod counters;
pub mod engine;
pub mod state;
pub mod types;

pub use counters::{CountersSnapshot, ScanCounters};
pub use engine::{PriceScan, ScanScheduler};
pub use state::{ScanGate, ScanGuard, ScanState};
pub use types::{SchedulerConfig, TickOutcome};
