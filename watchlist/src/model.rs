use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

/// Per-call verification answer: `symbol -> external id`.
/// Symbols the oracle does not recognize are simply absent.
pub type VerificationResult = HashMap<String, String>;

/// A tracked coin. Unique by `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchlistEntry {
    pub symbol: String,
    /// Identifier the oracle uses for this coin (e.g. `bitcoin` for `btc`).
    pub external_id: String,
}

impl WatchlistEntry {
    pub fn new(symbol: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            external_id: external_id.into(),
        }
    }
}

/// One immutable price observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSample {
    pub symbol: String,
    pub price: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl PriceSample {
    /// Absolute distance between this observation and `at`.
    pub fn distance_to(&self, at: DateTime<Utc>) -> TimeDelta {
        (self.observed_at - at).abs()
    }
}

/// A current price as reported by the oracle, in the configured quote currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OraclePrice {
    pub symbol: String,
    pub external_id: String,
    pub price: Decimal,
}

/// Outcome of one sampling pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Timestamp stamped on every sample written in this pass.
    pub observed_at: DateTime<Utc>,
    pub requested: usize,
    pub written: usize,
    /// Tracked symbols the oracle returned no price for.
    pub skipped: Vec<String>,
}

impl ScanReport {
    pub fn empty(observed_at: DateTime<Utc>) -> Self {
        Self {
            observed_at,
            requested: 0,
            written: 0,
            skipped: Vec::new(),
        }
    }
}
