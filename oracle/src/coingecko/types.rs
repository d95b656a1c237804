use std::collections::HashMap;

use serde::Deserialize;

/// One row of `GET /coins/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinListItem {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// `GET /simple/price` body: `{ "<id>": { "<currency>": <number> } }`.
///
/// Values stay as raw JSON so prices can be parsed from their exact text.
pub type SimplePriceResponse = HashMap<String, HashMap<String, serde_json::Value>>;
