//! Control commands sent to a device and their acknowledgements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Fan speed in percent, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct FanSpeed(u8);

impl FanSpeed {
    /// The preset buttons offered on the device detail panel.
    pub const PRESETS: [FanSpeed; 5] = [
        FanSpeed(0),
        FanSpeed(25),
        FanSpeed(50),
        FanSpeed(75),
        FanSpeed(100),
    ];

    /// # Errors
    ///
    /// Returns [`ValidationError::FanSpeedOutOfRange`] above 100.
    pub fn new(percent: u16) -> Result<Self, ValidationError> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .map(Self)
            .ok_or(ValidationError::FanSpeedOutOfRange(percent))
    }

    /// Clamp a reported (possibly fractional or noisy) value into range.
    #[must_use]
    pub fn from_reported(value: f64) -> Self {
        // NaN falls through to 0 via the saturating cast.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = value.round().clamp(0.0, 100.0) as u8;
        Self(percent)
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for FanSpeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u16::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A control action the dashboard can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Power(bool),
    FanSpeed(FanSpeed),
    TriggerUpdate,
}

impl Command {
    /// Short verb used in log events and failure notifications.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Power(_) => "control device",
            Self::FanSpeed(_) => "control fan",
            Self::TriggerUpdate => "trigger update",
        }
    }
}

/// JSON body returned by every control endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    pub message: String,
}
