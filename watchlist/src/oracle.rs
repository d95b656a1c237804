use async_trait::async_trait;

use crate::error::OracleError;
use crate::model::{OraclePrice, VerificationResult, WatchlistEntry};

/// External source of coin existence and current prices.
#[async_trait]
pub trait PriceOracle: Send + Sync + 'static {
    /// Returns the subset of `symbols` the oracle recognizes, mapped to its ids.
    async fn verify_coins(&self, symbols: &[String]) -> Result<VerificationResult, OracleError>;

    /// Current prices in the pinned quote currency. Coins the oracle cannot
    /// price may be omitted from the result.
    async fn coins_price(&self, coins: &[WatchlistEntry]) -> Result<Vec<OraclePrice>, OracleError>;
}
