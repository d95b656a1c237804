use serde::{Deserialize, Serialize};

/// Body of `PUT /currency/add` and `DELETE /currency/remove`.
#[derive(Debug, Deserialize)]
pub struct CoinsRequest {
    /// Comma-delimited symbols, e.g. `"btc,eth"`.
    pub coins: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub coin: String,
    /// Unix seconds.
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceResponse {
    pub coin: String,
    /// Decimal rendered as text so no precision is lost.
    pub price: String,
    /// Unix seconds of the sample actually returned.
    pub timestamp: i64,
}

/// Symbols that became tracked with this request.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddCoinsResponse {
    pub added: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveCoinsResponse {
    pub removed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Splits a comma-delimited symbol list: trimmed, lowercased, blanks dropped.
pub fn parse_coin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
