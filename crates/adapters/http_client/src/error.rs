//! HTTP client adapter error types.

use swissairdry_domain::error::{ApiError, SwissAirDryError};

/// Errors specific to the HTTP client adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The configured API URL cannot carry path segments.
    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("request failed")]
    Transport(#[source] reqwest::Error),

    /// Any non-2xx status. The body is never read.
    #[error("unexpected status {0}")]
    Status(u16),

    #[error("failed to decode response body")]
    Decode(#[source] reqwest::Error),
}

impl From<HttpClientError> for SwissAirDryError {
    fn from(err: HttpClientError) -> Self {
        let api = match err {
            HttpClientError::Status(code) => ApiError::Status(code),
            HttpClientError::Transport(source) => ApiError::Transport(source.to_string()),
            HttpClientError::Decode(source) => ApiError::Decode(source.to_string()),
            other @ (HttpClientError::Build(_) | HttpClientError::InvalidBaseUrl(_)) => {
                ApiError::Transport(other.to_string())
            }
        };
        SwissAirDryError::Api(api)
    }
}
