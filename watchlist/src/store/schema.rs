use sqlx::SqlitePool;

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Watchlist
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS watchlist (
  symbol TEXT PRIMARY KEY,
  external_id TEXT NOT NULL,
  added_at_ms INTEGER NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    // Price history; price kept as decimal text
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS price_samples (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  symbol TEXT NOT NULL,
  price TEXT NOT NULL,
  observed_at_ms INTEGER NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_price_samples_symbol_time ON price_samples(symbol, observed_at_ms);"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
