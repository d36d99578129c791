//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::core::MeetError;

/// Body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response. Domain errors
/// pick the status code, anything else is a 500.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match MeetError::find(&self.0) {
            Some(err @ MeetError::Validation(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Some(err @ MeetError::NotFound(_)) => (StatusCode::NOT_FOUND, err.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Server error"),
            ),
        };

        if status.is_server_error() {
            tracing::error!("{:#}", self.0);
        } else {
            tracing::debug!("{}: {:#}", status, self.0);
        }

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod events {
    pub use crate::api::routes::events::public::*;
}

pub mod health {
    pub use crate::api::routes::health::public::*;
}
