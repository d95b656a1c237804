use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use watchlist::VerificationResult;

use super::errors::CoinGeckoError;
use super::index::CoinIndex;
use super::types::{CoinListItem, SimplePriceResponse};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Pinned `vs_currency` for every price request, e.g. `usd`.
    pub quote_currency: String,
    pub timeout: Duration,
    /// How long a downloaded coin list is trusted for verification.
    pub coin_list_ttl: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            api_key: None,
            quote_currency: "usd".to_string(),
            timeout: Duration::from_secs(10),
            coin_list_ttl: Duration::from_secs(3600),
        }
    }
}

pub struct CoinGeckoClient {
    http: Client,
    cfg: CoinGeckoConfig,
    // Held across the refresh so only one download is in flight.
    index: Mutex<Option<CoinIndex>>,
}

impl CoinGeckoClient {
    pub fn new(cfg: CoinGeckoConfig) -> Result<Self, CoinGeckoError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &cfg.api_key {
            headers.insert(API_KEY_HEADER, HeaderValue::from_str(key)?);
        }

        let http = Client::builder()
            .timeout(cfg.timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            cfg,
            index: Mutex::new(None),
        })
    }

    pub fn quote_currency(&self) -> &str {
        &self.cfg.quote_currency
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), path)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_coin_list(&self) -> Result<Vec<CoinListItem>, CoinGeckoError> {
        let resp = self
            .http
            .get(self.url("coins/list"))
            .send()
            .await?
            .error_for_status()?;

        let list: Vec<CoinListItem> = resp.json().await?;

        debug!(coins = list.len(), "coingecko coin list fetched");
        Ok(list)
    }

    #[instrument(skip(self), fields(ids = ids.len()), level = "debug")]
    pub async fn fetch_simple_prices(
        &self,
        ids: &[&str],
    ) -> Result<SimplePriceResponse, CoinGeckoError> {
        let resp = self
            .http
            .get(self.url("simple/price"))
            .query(&[
                ("ids", ids.join(",")),
                ("vs_currencies", self.cfg.quote_currency.clone()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json().await?)
    }

    /// Resolves `symbols` against the cached coin list, refreshing it first
    /// when missing or older than the configured TTL.
    pub async fn resolve_symbols(
        &self,
        symbols: &[String],
    ) -> Result<VerificationResult, CoinGeckoError> {
        let mut guard = self.index.lock().await;

        let index = match guard.take() {
            Some(index) if index.is_fresh(self.cfg.coin_list_ttl) => index,
            _ => {
                let index = CoinIndex::build(self.fetch_coin_list().await?);
                info!(symbols = index.len(), "coin index refreshed");
                index
            }
        };

        let found = index.resolve(symbols);
        *guard = Some(index);
        Ok(found)
    }
}

/// Parses a JSON number from its exact text, scientific notation included.
pub fn parse_decimal(number: &serde_json::Number) -> Option<Decimal> {
    let text = number.to_string().to_lowercase();
    if text.contains('e') {
        Decimal::from_scientific(&text.replace("e+", "e")).ok()
    } else {
        Decimal::from_str(&text).ok()
    }
}
