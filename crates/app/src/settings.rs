//! Runtime settings shared between the HTTP client and the settings page.
//!
//! Held in memory only; the daemon seeds them from its configuration file.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use url::Url;

use swissairdry_domain::error::{SwissAirDryError, ValidationError};

/// Settings exposed through `GET/POST /api/settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the telemetry API.
    pub api_url: String,
    /// Broker coordinates shown to operators configuring devices.
    pub mqtt: MqttSettings,
}

/// MQTT broker coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttSettings {
    pub broker: String,
    pub port: u16,
    pub ws_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            mqtt: MqttSettings::default(),
        }
    }
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            ws_port: 9001,
        }
    }
}

impl Settings {
    /// # Errors
    ///
    /// Returns [`SwissAirDryError::Validation`] for a non-HTTP API URL or a zero port.
    pub fn validate(&self) -> Result<(), SwissAirDryError> {
        let usable = Url::parse(self.api_url.trim()).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
        });
        if !usable {
            return Err(ValidationError::InvalidApiUrl.into());
        }
        if self.mqtt.port == 0 || self.mqtt.ws_port == 0 {
            return Err(ValidationError::ZeroPort.into());
        }
        Ok(())
    }

    /// API base URL without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_url.trim().trim_end_matches('/')
    }
}

/// Cheaply cloneable handle to the current [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<Settings>>,
}

impl SettingsStore {
    /// # Errors
    ///
    /// Returns [`SwissAirDryError::Validation`] when `initial` is invalid.
    pub fn new(initial: Settings) -> Result<Self, SwissAirDryError> {
        initial.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(initial)),
        })
    }

    #[must_use]
    pub fn get(&self) -> Settings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current API base URL without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .api_base()
            .to_string()
    }

    /// Validate and swap in new settings; the old value is kept on error.
    ///
    /// # Errors
    ///
    /// Returns [`SwissAirDryError::Validation`] when `settings` is invalid.
    #[tracing::instrument(skip(self))]
    pub fn replace(&self, settings: Settings) -> Result<Settings, SwissAirDryError> {
        settings.validate()?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = settings.clone();
        tracing::info!(api_url = %settings.api_url, "settings updated");
        Ok(settings)
    }
}
