use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use common::logger::{child_span, warn_if_slow};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::error::{OracleError, WatchlistError};
use crate::model::{PriceSample, ScanReport, WatchlistEntry};
use crate::oracle::PriceOracle;
use crate::store::TimeSeriesStore;

const SLOW_STORE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Upper bound for every single oracle call.
    pub oracle_timeout: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            oracle_timeout: Duration::from_secs(10),
        }
    }
}

/// Orchestrates watchlist mutations, price scans and point-in-time queries.
pub struct WatchlistManager<O: PriceOracle, S: TimeSeriesStore> {
    oracle: Arc<O>,
    store: Arc<S>,
    cfg: ManagerConfig,
}

impl<O: PriceOracle, S: TimeSeriesStore> WatchlistManager<O, S> {
    pub fn new(oracle: Arc<O>, store: Arc<S>, cfg: ManagerConfig) -> Self {
        Self { oracle, store, cfg }
    }

    /// Verify `symbols` against the oracle and track the confirmed ones.
    ///
    /// Returns the entries that were not tracked before this call. Unconfirmed
    /// or failed candidates are dropped; if none survive nothing is written.
    #[instrument(skip(self, symbols), fields(candidates = symbols.len()))]
    pub async fn add_coins(&self, symbols: &[String]) -> Result<Vec<WatchlistEntry>, WatchlistError> {
        let candidates = validate_symbols(symbols)?;

        let verified = self.verify_concurrently(candidates).await;
        if verified.is_empty() {
            warn!("no candidate passed verification");
            return Err(WatchlistError::VerificationFailure);
        }

        let tracked: HashSet<String> = warn_if_slow(
            "store_list_watchlist",
            SLOW_STORE,
            self.store.list_watchlist(),
        )
        .await?
        .into_iter()
        .map(|e| e.symbol)
        .collect();

        let inserted = warn_if_slow(
            "store_add_watchlist",
            SLOW_STORE,
            self.store.add_watchlist(&verified),
        )
        .await?;

        if inserted == 0 {
            debug!("all verified coins already tracked");
            return Err(WatchlistError::PersistenceNoop);
        }

        let added: Vec<WatchlistEntry> = verified
            .into_iter()
            .filter(|e| !tracked.contains(&e.symbol))
            .collect();

        info!(added = added.len(), inserted, "coins added to watchlist");
        Ok(added)
    }

    /// Every tracked symbol, ascending.
    #[instrument(skip(self))]
    pub async fn list_coins(&self) -> Result<Vec<String>, WatchlistError> {
        let entries = self.store.list_watchlist().await?;

        let mut symbols: Vec<String> = entries.into_iter().map(|e| e.symbol).collect();
        symbols.sort();

        debug!(count = symbols.len(), "listed watchlist");
        Ok(symbols)
    }

    /// Stop tracking `symbols`. Their price history is kept.
    #[instrument(skip(self, symbols), fields(requested = symbols.len()))]
    pub async fn remove_coins(&self, symbols: &[String]) -> Result<u64, WatchlistError> {
        let targets: Vec<String> = validate_symbols(symbols)?.into_iter().collect();

        let deleted = warn_if_slow(
            "store_remove_watchlist",
            SLOW_STORE,
            self.store.remove_watchlist(&targets),
        )
        .await?;

        if deleted == 0 {
            debug!("none of the symbols were tracked");
            return Err(WatchlistError::PersistenceNoop);
        }

        info!(deleted, "coins removed from watchlist");
        Ok(deleted)
    }

    /// The stored sample for `symbol` closest in time to `at`, on either side.
    #[instrument(skip(self, at), fields(at = %at))]
    pub async fn get_price_at(
        &self,
        symbol: &str,
        at: DateTime<Utc>,
    ) -> Result<PriceSample, WatchlistError> {
        if symbol.trim().is_empty() {
            return Err(WatchlistError::Validation("symbol must not be empty".into()));
        }

        let sample = warn_if_slow(
            "store_nearest_price",
            SLOW_STORE,
            self.store.nearest_price(symbol, at),
        )
        .await?;

        debug!(
            found_at = %sample.observed_at,
            delta_ms = sample.distance_to(at).num_milliseconds(),
            "nearest sample found"
        );
        Ok(sample)
    }

    /// One sampling pass: price every tracked coin and append the results.
    ///
    /// An oracle failure aborts the pass before anything is written.
    #[instrument(skip(self))]
    pub async fn scan_prices(&self) -> Result<ScanReport, WatchlistError> {
        let entries = warn_if_slow(
            "store_list_watchlist",
            SLOW_STORE,
            self.store.list_watchlist(),
        )
        .await?;

        if entries.is_empty() {
            info!("watchlist empty; nothing to scan");
            return Ok(ScanReport::empty(Utc::now()));
        }

        let prices = match timeout(self.cfg.oracle_timeout, self.oracle.coins_price(&entries)).await
        {
            Ok(res) => res?,
            Err(_) => return Err(OracleError::Timeout(self.cfg.oracle_timeout).into()),
        };
        // storage resolution is milliseconds
        let observed_at = Utc::now().trunc_subsecs(3);

        let tracked: HashSet<&str> = entries.iter().map(|e| e.symbol.as_str()).collect();
        let mut priced: HashSet<String> = HashSet::with_capacity(prices.len());
        let mut samples = Vec::with_capacity(prices.len());

        for p in prices {
            if !tracked.contains(p.symbol.as_str()) {
                warn!(symbol = %p.symbol, "price returned for untracked symbol; discarded");
                continue;
            }
            if !priced.insert(p.symbol.clone()) {
                continue;
            }
            samples.push(PriceSample {
                symbol: p.symbol,
                price: p.price,
                observed_at,
            });
        }

        let skipped: Vec<String> = entries
            .iter()
            .filter(|e| !priced.contains(&e.symbol))
            .map(|e| e.symbol.clone())
            .collect();
        for symbol in &skipped {
            warn!(symbol = %symbol, "oracle returned no price; symbol skipped");
        }

        let written = if samples.is_empty() {
            0
        } else {
            warn_if_slow(
                "store_append_prices",
                SLOW_STORE,
                self.store.append_prices(&samples),
            )
            .await? as usize
        };

        info!(
            requested = entries.len(),
            written,
            skipped = skipped.len(),
            "price scan complete"
        );

        Ok(ScanReport {
            observed_at,
            requested: entries.len(),
            written,
            skipped,
        })
    }

    /// One verification task per candidate; results fan in through a shared
    /// map and every task is joined before returning.
    async fn verify_concurrently(&self, candidates: BTreeSet<String>) -> Vec<WatchlistEntry> {
        let verified: Arc<Mutex<HashMap<String, String>>> = Arc::new(Mutex::new(HashMap::new()));
        let mut units = JoinSet::new();

        for symbol in candidates {
            let oracle = Arc::clone(&self.oracle);
            let verified = Arc::clone(&verified);
            let limit = self.cfg.oracle_timeout;

            units.spawn(
                async move {
                    let query = std::slice::from_ref(&symbol);
                    match timeout(limit, oracle.verify_coins(query)).await {
                        Ok(Ok(found)) => match found.get(&symbol) {
                            Some(id) => {
                                debug!(symbol = %symbol, external_id = %id, "coin verified");
                                verified.lock().await.insert(symbol, id.clone());
                            }
                            None => debug!(symbol = %symbol, "coin not recognized"),
                        },
                        Ok(Err(e)) => {
                            warn!(symbol = %symbol, error = %e, "verification failed; candidate dropped")
                        }
                        Err(_) => warn!(
                            symbol = %symbol,
                            timeout_ms = limit.as_millis() as u64,
                            "verification timed out; candidate dropped"
                        ),
                    }
                }
                .instrument(child_span("verify_coin")),
            );
        }

        while let Some(joined) = units.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "verification task aborted");
            }
        }

        let mut found = verified.lock().await;
        let mut entries: Vec<WatchlistEntry> = found
            .drain()
            .map(|(symbol, external_id)| WatchlistEntry {
                symbol,
                external_id,
            })
            .collect();
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        entries
    }
}

/// Rejects empty input and blank symbols; collapses duplicates.
fn validate_symbols(symbols: &[String]) -> Result<BTreeSet<String>, WatchlistError> {
    if symbols.is_empty() {
        return Err(WatchlistError::Validation("no symbols given".into()));
    }
    if symbols.iter().any(|s| s.trim().is_empty()) {
        return Err(WatchlistError::Validation("symbols must not be empty".into()));
    }
    Ok(symbols.iter().cloned().collect())
}
