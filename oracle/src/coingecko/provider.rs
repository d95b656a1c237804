use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::{debug, warn};
use watchlist::{OracleError, OraclePrice, PriceOracle, VerificationResult, WatchlistEntry};

use super::client::{CoinGeckoClient, parse_decimal};
use super::errors::CoinGeckoError;
use super::types::SimplePriceResponse;

#[async_trait]
impl PriceOracle for CoinGeckoClient {
    async fn verify_coins(&self, symbols: &[String]) -> Result<VerificationResult, OracleError> {
        let found = self.resolve_symbols(symbols).await?;
        debug!(requested = symbols.len(), verified = found.len(), "coins verified");
        Ok(found)
    }

    async fn coins_price(&self, coins: &[WatchlistEntry]) -> Result<Vec<OraclePrice>, OracleError> {
        if coins.is_empty() {
            return Ok(Vec::new());
        }

        let ids: BTreeSet<&str> = coins.iter().map(|c| c.external_id.as_str()).collect();
        let ids: Vec<&str> = ids.into_iter().collect();

        let response = self.fetch_simple_prices(&ids).await?;
        Ok(extract_prices(coins, &response, self.quote_currency()))
    }
}

/// Pairs each coin with its quoted price. Coins without a usable price in
/// `quote` are left out.
pub fn extract_prices(
    coins: &[WatchlistEntry],
    response: &SimplePriceResponse,
    quote: &str,
) -> Vec<OraclePrice> {
    let mut out = Vec::with_capacity(coins.len());

    for coin in coins {
        let Some(value) = response
            .get(&coin.external_id)
            .and_then(|quotes| quotes.get(quote))
        else {
            debug!(symbol = %coin.symbol, id = %coin.external_id, quote, "no price in quote currency");
            continue;
        };

        match value.as_number().and_then(parse_decimal) {
            Some(price) => out.push(OraclePrice {
                symbol: coin.symbol.clone(),
                external_id: coin.external_id.clone(),
                price,
            }),
            None => {
                let e = CoinGeckoError::InvalidPrice {
                    id: coin.external_id.clone(),
                    value: value.to_string(),
                };
                warn!(symbol = %coin.symbol, error = %e, "unusable price; coin left out");
            }
        }
    }

    out
}
