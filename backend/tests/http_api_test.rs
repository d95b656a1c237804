use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use backend::http::router;
use watchlist::store::SqliteTimeSeriesStore;
use watchlist::{
    ManagerConfig, OracleError, OraclePrice, PriceOracle, VerificationResult, WatchlistEntry,
    WatchlistManager,
};

/// Oracle with a fixed table of `symbol -> (id, price)`.
struct StaticOracle {
    coins: HashMap<String, (String, Decimal)>,
}

impl StaticOracle {
    fn new(coins: &[(&str, &str, &str)]) -> Self {
        Self {
            coins: coins
                .iter()
                .map(|(sym, id, price)| {
                    (
                        sym.to_string(),
                        (id.to_string(), Decimal::from_str(price).unwrap()),
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl PriceOracle for StaticOracle {
    async fn verify_coins(&self, symbols: &[String]) -> Result<VerificationResult, OracleError> {
        Ok(symbols
            .iter()
            .filter_map(|s| self.coins.get(s).map(|(id, _)| (s.clone(), id.clone())))
            .collect())
    }

    async fn coins_price(&self, coins: &[WatchlistEntry]) -> Result<Vec<OraclePrice>, OracleError> {
        Ok(coins
            .iter()
            .filter_map(|c| {
                self.coins.get(&c.symbol).map(|(id, price)| OraclePrice {
                    symbol: c.symbol.clone(),
                    external_id: id.clone(),
                    price: *price,
                })
            })
            .collect())
    }
}

type TestManager = WatchlistManager<StaticOracle, SqliteTimeSeriesStore>;

async fn setup() -> (Router, Arc<TestManager>) {
    let store = Arc::new(SqliteTimeSeriesStore::in_memory().await.unwrap());
    let oracle = Arc::new(StaticOracle::new(&[
        ("btc", "bitcoin", "64000.25"),
        ("eth", "ethereum", "3000.10"),
    ]));
    let manager = Arc::new(WatchlistManager::new(
        oracle,
        store,
        ManagerConfig::default(),
    ));
    (router(Arc::clone(&manager)), manager)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => req
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _) = setup().await;

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn add_normalizes_symbols_and_lists_them() {
    let (app, _) = setup().await;

    let (status, body) = send(
        &app,
        "PUT",
        "/currency/add",
        Some(json!({ "coins": " BTC, eth ,,fake" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "added": ["btc", "eth"] }));

    let (status, body) = send(&app, "GET", "/currency/watchlist", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["btc", "eth"]));
}

#[tokio::test]
async fn add_rejects_unknown_and_duplicate_coins() {
    let (app, _) = setup().await;

    let (status, body) = send(
        &app,
        "PUT",
        "/currency/add",
        Some(json!({ "coins": "fake1,fake2" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "PUT", "/currency/add", Some(json!({ "coins": "btc" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "PUT", "/currency/add", Some(json!({ "coins": "btc" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "PUT", "/currency/add", Some(json!({ "coins": " , " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_lists_only_coins_not_already_tracked() {
    let (app, _) = setup().await;
    send(&app, "PUT", "/currency/add", Some(json!({ "coins": "btc" }))).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/currency/add",
        Some(json!({ "coins": "btc,eth" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "added": ["eth"] }));
}

#[tokio::test]
async fn remove_reports_count_or_conflict() {
    let (app, _) = setup().await;
    send(&app, "PUT", "/currency/add", Some(json!({ "coins": "btc,eth" }))).await;

    let (status, _) = send(
        &app,
        "DELETE",
        "/currency/remove",
        Some(json!({ "coins": "doge" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "DELETE",
        "/currency/remove",
        Some(json!({ "coins": "ETH" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "removed": 1 }));

    let (_, body) = send(&app, "GET", "/currency/watchlist", None).await;
    assert_eq!(body, json!(["btc"]));
}

#[tokio::test]
async fn price_returns_nearest_sample() {
    let (app, manager) = setup().await;
    send(&app, "PUT", "/currency/add", Some(json!({ "coins": "btc" }))).await;
    let report = manager.scan_prices().await.unwrap();

    let uri = format!("/currency/price?coin=BTC&timestamp={}", Utc::now().timestamp());
    let (status, body) = send(&app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coin"], "btc");
    assert_eq!(body["price"], "64000.25");
    assert_eq!(body["timestamp"], report.observed_at.timestamp());
}

#[tokio::test]
async fn price_without_samples_is_not_found() {
    let (app, _) = setup().await;

    let uri = format!("/currency/price?coin=btc&timestamp={}", Utc::now().timestamp());
    let (status, body) = send(&app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("btc"));
}

#[tokio::test]
async fn price_with_bad_query_is_rejected() {
    let (app, _) = setup().await;

    let (status, _) = send(&app, "GET", "/currency/price?coin=btc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/currency/price?coin=btc&timestamp={}", i64::MAX);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
