//! HTTP client configuration.

use std::time::Duration;

/// Settings for the underlying [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout, connect included.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("swissairdryd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
