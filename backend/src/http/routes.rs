use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, put};
use tower_http::trace::TraceLayer;

use watchlist::{PriceOracle, TimeSeriesStore, WatchlistManager};

use super::handlers;

/// Builds the application router around a shared manager.
pub fn router<O, S>(manager: Arc<WatchlistManager<O, S>>) -> Router
where
    O: PriceOracle,
    S: TimeSeriesStore,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/currency/add", put(handlers::add_coins::<O, S>))
        .route("/currency/remove", delete(handlers::remove_coins::<O, S>))
        .route("/currency/watchlist", get(handlers::list_coins::<O, S>))
        .route("/currency/price", get(handlers::price_at::<O, S>))
        .layer(TraceLayer::new_for_http())
        .with_state(manager)
}
