//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use swissairdry_domain::error::{SwissAirDryError, ValidationError};

/// JSON error body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Domain(#[from] SwissAirDryError),

    #[error("failed to render template")]
    Render(#[from] askama::Error),
}

impl From<ValidationError> for WebError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Domain(SwissAirDryError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Domain(SwissAirDryError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Domain(SwissAirDryError::Api(err)) => {
                tracing::warn!(error = %err, "upstream API error");
                StatusCode::BAD_GATEWAY
            }
            Self::Render(err) => {
                tracing::error!(error = %err, "template rendering failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
