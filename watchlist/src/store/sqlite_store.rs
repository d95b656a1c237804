//! SqliteTimeSeriesStore
//! ---------------------
//! SQLite-backed implementation of [`TimeSeriesStore`]. It keeps:
//!
//!  - the watchlist (one row per symbol, insert-or-ignore)
//!  - the append-only price history, prices stored as decimal text so no
//!    precision is lost, timestamps as Unix milliseconds
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, instrument};

use super::{TimeSeriesStore, schema};
use crate::error::StoreError;
use crate::model::{PriceSample, WatchlistEntry};

pub struct SqliteTimeSeriesStore {
    pool: SqlitePool,
}

impl SqliteTimeSeriesStore {
    /// Connects to `url` (creating the file if missing) and ensures the schema exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory database. Pinned to one connection that never idles
    /// out, since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        schema::migrate(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TimeSeriesStore for SqliteTimeSeriesStore {
    #[instrument(skip(self, entries), fields(count = entries.len()), level = "debug")]
    async fn add_watchlist(&self, entries: &[WatchlistEntry]) -> Result<u64, StoreError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let now_ms = Utc::now().timestamp_millis();
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO watchlist (symbol, external_id, added_at_ms) ");
        qb.push_values(entries, |mut row, e| {
            row.push_bind(e.symbol.clone())
                .push_bind(e.external_id.clone())
                .push_bind(now_ms);
        });
        qb.push(" ON CONFLICT(symbol) DO NOTHING");

        let res = qb.build().execute(&self.pool).await?;

        debug!(inserted = res.rows_affected(), "watchlist insert executed");
        Ok(res.rows_affected())
    }

    async fn list_watchlist(&self) -> Result<Vec<WatchlistEntry>, StoreError> {
        let rows = sqlx::query("SELECT symbol, external_id FROM watchlist ORDER BY symbol")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| WatchlistEntry {
                symbol: r.get("symbol"),
                external_id: r.get("external_id"),
            })
            .collect())
    }

    #[instrument(skip(self, symbols), fields(count = symbols.len()), level = "debug")]
    async fn remove_watchlist(&self, symbols: &[String]) -> Result<u64, StoreError> {
        if symbols.is_empty() {
            return Ok(0);
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM watchlist WHERE symbol IN (");
        let mut list = qb.separated(", ");
        for s in symbols {
            list.push_bind(s.clone());
        }
        list.push_unseparated(")");

        let res = qb.build().execute(&self.pool).await?;

        debug!(deleted = res.rows_affected(), "watchlist delete executed");
        Ok(res.rows_affected())
    }

    #[instrument(skip(self, samples), fields(count = samples.len()), level = "debug")]
    async fn append_prices(&self, samples: &[PriceSample]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for s in samples {
            let res = sqlx::query(
                "INSERT INTO price_samples (symbol, price, observed_at_ms) VALUES (?, ?, ?)",
            )
            .bind(&s.symbol)
            .bind(s.price.to_string())
            .bind(s.observed_at.timestamp_millis())
            .execute(&mut *tx)
            .await?;

            inserted += res.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    #[instrument(skip(self), level = "debug")]
    async fn nearest_price(
        &self,
        symbol: &str,
        at: DateTime<Utc>,
    ) -> Result<PriceSample, StoreError> {
        let row = sqlx::query(
            r#"
SELECT symbol, price, observed_at_ms
FROM price_samples
WHERE symbol = ?
ORDER BY ABS(observed_at_ms - ?) ASC, observed_at_ms ASC
LIMIT 1;
"#,
        )
        .bind(symbol)
        .bind(at.timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => row_to_sample(&r),
            None => Err(StoreError::NotFound(symbol.to_string())),
        }
    }
}

fn row_to_sample(r: &SqliteRow) -> Result<PriceSample, StoreError> {
    let price_text: String = r.get("price");
    let price = Decimal::from_str(&price_text)
        .map_err(|e| StoreError::Corrupt(format!("price '{price_text}': {e}")))?;

    let observed_at_ms: i64 = r.get("observed_at_ms");
    let observed_at = DateTime::<Utc>::from_timestamp_millis(observed_at_ms)
        .ok_or_else(|| StoreError::Corrupt(format!("observed_at_ms out of range: {observed_at_ms}")))?;

    Ok(PriceSample {
        symbol: r.get("symbol"),
        price,
        observed_at,
    })
}
