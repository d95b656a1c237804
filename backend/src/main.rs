use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use backend::{config::AppConfig, http::router};
use common::logger::init_logger;
use oracle::CoinGeckoClient;
use scheduler::{ScanCounters, ScanScheduler};
use watchlist::{WatchlistManager, store::SqliteTimeSeriesStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("load configuration")?;
    init_logger("watchlist-backend", cfg.json_logs);

    info!(
        bind = %cfg.bind_addr,
        quote = %cfg.quote_currency,
        cooldown_s = cfg.scan_cooldown.as_secs(),
        startup_delay_s = cfg.scan_startup_delay.as_secs(),
        "starting watchlist backend"
    );

    // Store unreachable at startup is fatal.
    let store = Arc::new(
        SqliteTimeSeriesStore::connect(&cfg.database_url)
            .await
            .with_context(|| format!("open store at {}", cfg.database_url))?,
    );

    let oracle =
        Arc::new(CoinGeckoClient::new(cfg.coingecko()).context("build coingecko client")?);

    let manager = Arc::new(WatchlistManager::new(oracle, store, cfg.manager()));

    let scan_task = Arc::new(ScanScheduler::new(
        cfg.scheduler(),
        Arc::clone(&manager),
        ScanCounters::default(),
    ))
    .spawn();

    let listener = TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("bind {}", cfg.bind_addr))?;
    info!(addr = %cfg.bind_addr, "http server listening");

    let served = axum::serve(listener, router(manager))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    scan_task.abort();
    served.context("http server failed")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
