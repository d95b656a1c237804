//! The scan loop.
//!
//! Every cooldown it:
//!   1. Tries to enter the single-flight gate; a busy gate skips the tick.
//!   2. Runs one scan in its own task, inside a fresh root span.
//!   3. Records the outcome in [`ScanCounters`].
//!
//! Failures are logged and counted; the loop never stops on its own.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{Instrument, info, warn};

use common::logger::{TraceId, root_span};
use watchlist::{PriceOracle, ScanReport, TimeSeriesStore, WatchlistError, WatchlistManager};

use super::counters::ScanCounters;
use super::state::ScanGate;
use super::types::{SchedulerConfig, TickOutcome};

/// One sampling pass, as seen by the scheduler.
#[async_trait]
pub trait PriceScan: Send + Sync + 'static {
    async fn scan(&self) -> Result<ScanReport, WatchlistError>;
}

#[async_trait]
impl<O, S> PriceScan for WatchlistManager<O, S>
where
    O: PriceOracle,
    S: TimeSeriesStore,
{
    async fn scan(&self) -> Result<ScanReport, WatchlistError> {
        self.scan_prices().await
    }
}

pub struct ScanScheduler<P: PriceScan> {
    cfg: SchedulerConfig,
    scanner: Arc<P>,
    gate: Arc<ScanGate>,
    counters: ScanCounters,
}

impl<P: PriceScan> ScanScheduler<P> {
    pub fn new(cfg: SchedulerConfig, scanner: Arc<P>, counters: ScanCounters) -> Self {
        Self {
            cfg,
            scanner,
            gate: ScanGate::new(),
            counters,
        }
    }

    pub fn counters(&self) -> &ScanCounters {
        &self.counters
    }

    /// Runs one scan unless another one is in flight.
    pub async fn tick(&self) -> TickOutcome {
        let trace_id = TraceId::default();
        self.tick_inner().instrument(root_span("scan", &trace_id)).await
    }

    async fn tick_inner(&self) -> TickOutcome {
        let Some(_guard) = self.gate.try_begin() else {
            self.counters.scans_skipped.fetch_add(1, Ordering::Relaxed);
            warn!("previous scan still running; tick skipped");
            return TickOutcome::Skipped;
        };

        match self.scanner.scan().await {
            Ok(report) => {
                self.counters.scans_completed.fetch_add(1, Ordering::Relaxed);
                self.counters
                    .samples_written
                    .fetch_add(report.written as u64, Ordering::Relaxed);

                let totals = self.counters.snapshot();
                info!(
                    requested = report.requested,
                    written = report.written,
                    skipped = report.skipped.len(),
                    scans_completed = totals.scans_completed,
                    samples_written = totals.samples_written,
                    "price scan completed"
                );
                TickOutcome::Completed(report)
            }
            Err(e) => {
                self.counters.scans_failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    error = %e,
                    scans_failed = self.counters.scans_failed.load(Ordering::Relaxed),
                    "price scan failed"
                );
                TickOutcome::Failed(e)
            }
        }
    }

    /// Loops forever: startup delay, then one tick per cooldown.
    ///
    /// Each tick runs in its own task so a slow scan does not hold up the
    /// clock; the next tick then finds the gate busy and is skipped.
    /// In-flight scans are aborted when this future is dropped.
    pub async fn run(self: Arc<Self>) {
        info!(
            cooldown_ms = self.cfg.cooldown.as_millis() as u64,
            startup_delay_ms = self.cfg.startup_delay.as_millis() as u64,
            "price scan scheduler started"
        );

        sleep(self.cfg.startup_delay).await;

        let mut ticker = interval(self.cfg.cooldown);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight = JoinSet::new();
        loop {
            ticker.tick().await;

            while in_flight.try_join_next().is_some() {}

            let this = Arc::clone(&self);
            in_flight.spawn(async move {
                this.tick().await;
            });
        }
    }

    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
