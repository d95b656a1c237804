use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use watchlist::WatchlistError;

use super::types::ErrorBody;

/// A [`WatchlistError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub WatchlistError);

impl From<WatchlistError> for ApiError {
    fn from(e: WatchlistError) -> Self {
        ApiError(e)
    }
}

pub fn status_for(e: &WatchlistError) -> StatusCode {
    match e {
        WatchlistError::Validation(_) | WatchlistError::VerificationFailure => {
            StatusCode::BAD_REQUEST
        }
        WatchlistError::PersistenceNoop => StatusCode::CONFLICT,
        WatchlistError::NotFound(_) => StatusCode::NOT_FOUND,
        WatchlistError::Oracle(_) => StatusCode::BAD_GATEWAY,
        WatchlistError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
