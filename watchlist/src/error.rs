use std::time::Duration;

use thiserror::Error;

/// Failures reported by a price oracle. Any of them aborts the call without
/// partial results.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("oracle request failed: {0}")]
    Request(String),

    #[error("invalid oracle response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no price samples for {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("no coins passed verification")]
    VerificationFailure,

    /// The store executed the operation but nothing changed.
    #[error("nothing changed: already tracked or not tracked")]
    PersistenceNoop,

    #[error("no price samples for {0}")]
    NotFound(String),

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for WatchlistError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(symbol) => WatchlistError::NotFound(symbol),
            other => WatchlistError::Storage(other),
        }
    }
}
