use std::collections::HashMap;
use std::time::{Duration, Instant};

use watchlist::VerificationResult;

use super::types::CoinListItem;

/// Symbol -> coin id lookup built from `/coins/list`.
///
/// Symbols are matched case-insensitively. CoinGecko lists many coins under
/// the same ticker; the first one listed keeps the symbol.
#[derive(Debug)]
pub struct CoinIndex {
    by_symbol: HashMap<String, String>,
    fetched_at: Instant,
}

impl CoinIndex {
    pub fn build(list: Vec<CoinListItem>) -> Self {
        let mut by_symbol = HashMap::with_capacity(list.len());
        for coin in list {
            by_symbol
                .entry(coin.symbol.to_lowercase())
                .or_insert(coin.id);
        }

        Self {
            by_symbol,
            fetched_at: Instant::now(),
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Maps each recognized input symbol (as given) to its coin id.
    pub fn resolve(&self, symbols: &[String]) -> VerificationResult {
        symbols
            .iter()
            .filter_map(|s| {
                self.by_symbol
                    .get(&s.to_lowercase())
                    .map(|id| (s.clone(), id.clone()))
            })
            .collect()
    }
}
