use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};

use oracle::CoinGeckoConfig;
use scheduler::SchedulerConfig;
use watchlist::ManagerConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// SQLite connection string.
    pub database_url: String,

    pub bind_addr: SocketAddr,

    // =========================
    // Oracle configuration
    // =========================
    pub coingecko_base_url: String,

    /// Sent as `x-cg-demo-api-key` when set.
    pub coingecko_api_key: Option<String>,

    /// Pinned `vs_currency` for every price request.
    pub quote_currency: String,

    /// Bound on every oracle call, both per request and per verification unit.
    pub oracle_timeout: Duration,

    /// How long the downloaded coin list is reused for verification.
    pub coin_list_ttl: Duration,

    // =========================
    // Scheduler configuration
    // =========================
    /// Interval between scans.
    pub scan_cooldown: Duration,

    /// Wait before the first scan after start.
    pub scan_startup_delay: Duration,

    /// JSON log lines instead of human-readable output.
    pub json_logs: bool,
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://watchlist.db?mode=rwc".to_string());

        let bind_addr: SocketAddr = var("HTTP_BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("HTTP_BIND_ADDR must be a socket address")?;

        let scan_cooldown = secs(&var, "SCAN_COOLDOWN_SECS", 60)?;
        if scan_cooldown.is_zero() {
            bail!("SCAN_COOLDOWN_SECS must be greater than zero");
        }

        let oracle_timeout = secs(&var, "ORACLE_TIMEOUT_SECS", 10)?;
        if oracle_timeout.is_zero() {
            bail!("ORACLE_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            database_url,
            bind_addr,
            coingecko_base_url: var("COINGECKO_BASE_URL")
                .unwrap_or_else(|| "https://api.coingecko.com/api/v3".to_string()),
            coingecko_api_key: var("COINGECKO_API_KEY"),
            quote_currency: var("QUOTE_CURRENCY")
                .map(|c| c.to_lowercase())
                .unwrap_or_else(|| "usd".to_string()),
            oracle_timeout,
            coin_list_ttl: secs(&var, "COIN_LIST_TTL_SECS", 3600)?,
            scan_cooldown,
            scan_startup_delay: secs(&var, "SCAN_STARTUP_DELAY_SECS", 5)?,
            json_logs: var("APP_ENV").is_some_and(|e| e.eq_ignore_ascii_case("production")),
        })
    }

    pub fn coingecko(&self) -> CoinGeckoConfig {
        CoinGeckoConfig {
            base_url: self.coingecko_base_url.clone(),
            api_key: self.coingecko_api_key.clone(),
            quote_currency: self.quote_currency.clone(),
            timeout: self.oracle_timeout,
            coin_list_ttl: self.coin_list_ttl,
        }
    }

    pub fn manager(&self) -> ManagerConfig {
        ManagerConfig {
            oracle_timeout: self.oracle_timeout,
        }
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            cooldown: self.scan_cooldown,
            startup_delay: self.scan_startup_delay,
        }
    }
}

fn secs(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> anyhow::Result<Duration> {
    match var(key) {
        Some(raw) => {
            let n: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}"))?;
            Ok(Duration::from_secs(n))
        }
        None => Ok(Duration::from_secs(default)),
    }
}
