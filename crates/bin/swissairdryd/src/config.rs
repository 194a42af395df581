//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `swissairdry.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use swissairdry_adapter_http_client::HttpClientConfig;
use swissairdry_app::dashboard::DashboardOptions;
use swissairdry_app::settings::{MqttSettings, Settings};
use swissairdry_domain::error::SwissAirDryError;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Upstream telemetry API.
    pub api: ApiConfig,
    /// Refresh cadence and layout.
    pub dashboard: DashboardConfig,
    /// Broker coordinates shown on the settings page.
    pub mqtt: MqttConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Initial base URL; editable at runtime from the settings page.
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_interval_secs: u64,
    /// Wait between an accepted command and the reconciling re-fetch.
    pub settle_delay_ms: u64,
    pub readings_limit: usize,
    pub show_system_status: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub ws_port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `swissairdry.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("swissairdry.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SWISSAIRDRY_HOST") {
            self.server.host = val;
        }
        if let Some(port) = lookup("SWISSAIRDRY_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some((host, port)) = lookup("SWISSAIRDRY_BIND")
            .as_deref()
            .and_then(|val| val.rsplit_once(':'))
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("SWISSAIRDRY_API_URL") {
            self.api.url = val;
        }
        if let Some(val) = lookup("SWISSAIRDRY_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.dashboard.refresh_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "dashboard.refresh_interval_secs must be non-zero".to_string(),
            ));
        }
        if self.dashboard.readings_limit == 0 {
            return Err(ConfigError::Validation(
                "dashboard.readings_limit must be non-zero".to_string(),
            ));
        }
        self.settings().validate()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Initial runtime settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            api_url: self.api.url.clone(),
            mqtt: MqttSettings {
                broker: self.mqtt.broker.clone(),
                port: self.mqtt.port,
                ws_port: self.mqtt.ws_port,
            },
        }
    }

    #[must_use]
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            refresh_interval: Duration::from_secs(self.dashboard.refresh_interval_secs),
            settle_delay: Duration::from_millis(self.dashboard.settle_delay_ms),
            readings_limit: self.dashboard.readings_limit,
            show_system_status: self.dashboard.show_system_status,
        }
    }

    #[must_use]
    pub fn http_client(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: Duration::from_secs(self.api.timeout_secs),
            ..HttpClientConfig::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: Settings::default().api_url,
            timeout_secs: 10,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let options = DashboardOptions::default();
        Self {
            refresh_interval_secs: options.refresh_interval.as_secs(),
            settle_delay_ms: 2_000,
            readings_limit: options.readings_limit,
            show_system_status: options.show_system_status,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        let mqtt = MqttSettings::default();
        Self {
            broker: mqtt.broker,
            port: mqtt.port,
            ws_port: mqtt.ws_port,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "swissairdryd=info,swissairdry=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// The initial runtime settings are invalid.
    #[error("invalid settings")]
    Settings(#[from] SwissAirDryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api.url, "http://localhost:5000");
        assert_eq!(config.dashboard.refresh_interval_secs, 30);
        assert_eq!(config.dashboard.settle_delay_ms, 2_000);
        assert_eq!(config.dashboard.readings_limit, 20);
        assert!(config.dashboard.show_system_status);
        assert_eq!(config.mqtt.port, 1883);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [api]
            url = 'http://telemetry.local:5000'
            timeout_secs = 3

            [dashboard]
            refresh_interval_secs = 10
            settle_delay_ms = 500
            readings_limit = 50
            show_system_status = false

            [mqtt]
            broker = 'mqtt.local'
            port = 8883
            ws_port = 8884

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.api.url, "http://telemetry.local:5000");
        assert_eq!(config.http_client().timeout, Duration::from_secs(3));
        assert_eq!(config.mqtt.broker, "mqtt.local");
        assert_eq!(config.logging.filter, "debug");

        let options = config.dashboard_options();
        assert_eq!(options.refresh_interval, Duration::from_secs(10));
        assert_eq!(options.settle_delay, Duration::from_millis(500));
        assert_eq!(options.readings_limit, 50);
        assert!(!options.show_system_status);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_prefer_environment_over_file_values() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("SWISSAIRDRY_BIND", "127.0.0.1:9000"),
            ("SWISSAIRDRY_API_URL", "https://api.example.org"),
            ("SWISSAIRDRY_LOG", "warn"),
            ("RUST_LOG", "trace"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.settings().api_url, "https://api.example.org");
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparseable_port_override() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("SWISSAIRDRY_PORT", "eighty")]));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_refresh_interval() {
        let mut config = Config::default();
        config.dashboard.refresh_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_non_http_api_url() {
        let mut config = Config::default();
        config.api.url = "localhost:5000".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Settings(_))));
    }
}
