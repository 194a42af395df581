//! Device: a drying unit known to the telemetry API.

use serde::{Deserialize, Serialize};

use crate::error::{SwissAirDryError, ValidationError};
use crate::id::DeviceId;
use crate::time::Timestamp;

/// A device as reported by `GET /api/devices` and `GET /api/devices/{id}`.
///
/// Optional fields are frequently absent for devices that never completed
/// their first check-in; they are rendered as placeholders, never as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: DeviceId,
    pub name: String,
    #[serde(rename = "type", default = "unknown_type")]
    pub device_type: String,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default, deserialize_with = "crate::time::deserialize_option")]
    pub last_seen: Option<Timestamp>,
}

fn unknown_type() -> String {
    "unknown".to_string()
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SwissAirDryError::Validation`] when `device_id` is blank.
    pub fn validate(&self) -> Result<(), SwissAirDryError> {
        if self.device_id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyDeviceId.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    device_id: Option<String>,
    name: Option<String>,
    device_type: Option<String>,
    firmware_version: Option<String>,
    ip_address: Option<String>,
    mac_address: Option<String>,
    is_online: bool,
    last_seen: Option<Timestamp>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    #[must_use]
    pub fn firmware_version(mut self, version: impl Into<String>) -> Self {
        self.firmware_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    #[must_use]
    pub fn mac_address(mut self, mac: impl Into<String>) -> Self {
        self.mac_address = Some(mac.into());
        self
    }

    #[must_use]
    pub fn online(mut self, is_online: bool) -> Self {
        self.is_online = is_online;
        self
    }

    #[must_use]
    pub fn last_seen(mut self, ts: Timestamp) -> Self {
        self.last_seen = Some(ts);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// Missing `name` falls back to the device id; missing type to `unknown`.
    ///
    /// # Errors
    ///
    /// Returns [`SwissAirDryError::Validation`] if `device_id` is missing or blank.
    pub fn build(self) -> Result<Device, SwissAirDryError> {
        let device_id = DeviceId::new(self.device_id.unwrap_or_default())?;
        let device = Device {
            name: self.name.unwrap_or_else(|| device_id.to_string()),
            device_id,
            device_type: self.device_type.unwrap_or_else(unknown_type),
            firmware_version: self.firmware_version,
            ip_address: self.ip_address,
            mac_address: self.mac_address,
            is_online: self.is_online,
            last_seen: self.last_seen,
        };
        device.validate()?;
        Ok(device)
    }
}
