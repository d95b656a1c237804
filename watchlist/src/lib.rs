//! Watchlist observation engine.
//!
//! Keeps a verified set of coin symbols, samples their prices from a
//! [`PriceOracle`] into a [`TimeSeriesStore`] and answers nearest-timestamp
//! price queries.

pub mod error;
pub mod manager;
pub mod model;
pub mod oracle;
pub mod store;

pub use error::{OracleError, StoreError, WatchlistError};
pub use manager::{ManagerConfig, WatchlistManager};
pub use model::{OraclePrice, PriceSample, ScanReport, VerificationResult, WatchlistEntry};
pub use oracle::PriceOracle;
pub use store::TimeSeriesStore;
