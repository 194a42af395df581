//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SwissAirDryError`] via `From` at the port boundary.

/// Top-level error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum SwissAirDryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("fan speed {0} is out of range (0-100)")]
    FanSpeedOutOfRange(u16),

    #[error("API URL must start with http:// or https://")]
    InvalidApiUrl,

    #[error("port must be non-zero")]
    ZeroPort,
}

/// A referenced record does not exist.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} '{id}' not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failure talking to the external telemetry API.
///
/// Non-2xx responses are treated uniformly; the body is never inspected.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, …).
    #[error("network error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The response arrived but its body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}
