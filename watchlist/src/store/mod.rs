pub mod schema;
pub mod sqlite_store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::{PriceSample, WatchlistEntry};

pub use sqlite_store::SqliteTimeSeriesStore;

/// Durable watchlist membership plus append-only price history.
#[async_trait]
pub trait TimeSeriesStore: Send + Sync + 'static {
    /// Insert-or-ignore. Returns the number of newly tracked symbols.
    async fn add_watchlist(&self, entries: &[WatchlistEntry]) -> Result<u64, StoreError>;

    async fn list_watchlist(&self) -> Result<Vec<WatchlistEntry>, StoreError>;

    /// Returns the number of entries deleted.
    async fn remove_watchlist(&self, symbols: &[String]) -> Result<u64, StoreError>;

    /// Appends all samples or none of them.
    async fn append_prices(&self, samples: &[PriceSample]) -> Result<u64, StoreError>;

    /// Sample for `symbol` closest to `at` in absolute time; the earlier one
    /// on a tie. `StoreError::NotFound` when the symbol has no samples.
    async fn nearest_price(&self, symbol: &str, at: DateTime<Utc>)
    -> Result<PriceSample, StoreError>;
}
