use thiserror::Error;
use watchlist::OracleError;

#[derive(Error, Debug)]
pub enum CoinGeckoError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid api key header: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

    #[error("invalid price for {id}: {value}")]
    InvalidPrice { id: String, value: String },
}

impl From<CoinGeckoError> for OracleError {
    fn from(e: CoinGeckoError) -> Self {
        match e {
            CoinGeckoError::Http(e) if e.is_decode() => OracleError::InvalidResponse(e.to_string()),
            CoinGeckoError::InvalidPrice { id, value } => {
                OracleError::InvalidResponse(format!("price for {id}: {value}"))
            }
            other => OracleError::Request(other.to_string()),
        }
    }
}
