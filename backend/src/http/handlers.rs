use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::DateTime;

use watchlist::{PriceOracle, TimeSeriesStore, WatchlistError, WatchlistManager};

use super::error::ApiError;
use super::types::{
    AddCoinsResponse, CoinsRequest, PriceQuery, PriceResponse, RemoveCoinsResponse,
    parse_coin_list,
};

type Manager<O, S> = State<Arc<WatchlistManager<O, S>>>;

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// PUT /currency/add
pub async fn add_coins<O: PriceOracle, S: TimeSeriesStore>(
    State(manager): Manager<O, S>,
    Json(req): Json<CoinsRequest>,
) -> Result<Json<AddCoinsResponse>, ApiError> {
    let symbols = parse_coin_list(&req.coins);
    let added = manager.add_coins(&symbols).await?;

    Ok(Json(AddCoinsResponse {
        added: added.into_iter().map(|e| e.symbol).collect(),
    }))
}

/// DELETE /currency/remove
pub async fn remove_coins<O: PriceOracle, S: TimeSeriesStore>(
    State(manager): Manager<O, S>,
    Json(req): Json<CoinsRequest>,
) -> Result<Json<RemoveCoinsResponse>, ApiError> {
    let symbols = parse_coin_list(&req.coins);
    let removed = manager.remove_coins(&symbols).await?;

    Ok(Json(RemoveCoinsResponse { removed }))
}

/// GET /currency/watchlist
pub async fn list_coins<O: PriceOracle, S: TimeSeriesStore>(
    State(manager): Manager<O, S>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(manager.list_coins().await?))
}

/// GET /currency/price?coin=btc&timestamp=1700000000
pub async fn price_at<O: PriceOracle, S: TimeSeriesStore>(
    State(manager): Manager<O, S>,
    Query(q): Query<PriceQuery>,
) -> Result<Json<PriceResponse>, ApiError> {
    let at = DateTime::from_timestamp(q.timestamp, 0).ok_or_else(|| {
        WatchlistError::Validation(format!("timestamp {} is out of range", q.timestamp))
    })?;

    let sample = manager
        .get_price_at(&q.coin.trim().to_lowercase(), at)
        .await?;

    Ok(Json(PriceResponse {
        coin: sample.symbol,
        price: sample.price.to_string(),
        timestamp: sample.observed_at.timestamp(),
    }))
}
