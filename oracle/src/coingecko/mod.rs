pub mod client;
pub mod errors;
pub mod index;
pub mod provider;
pub mod types;

pub use client::{CoinGeckoClient, CoinGeckoConfig};
pub use errors::CoinGeckoError;
pub use types::*;
