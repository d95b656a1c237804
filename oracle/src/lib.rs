pub mod coingecko;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig, CoinGeckoError};
