//! Reading: one sensor sample reported by a device.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A single sensor sample.
///
/// Every measurement is optional: sensors that are absent on a given
/// hardware revision simply report `null`. The API returns readings
/// newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(deserialize_with = "crate::time::deserialize")]
    pub timestamp: Timestamp,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub fan_speed: Option<f64>,
    #[serde(default)]
    pub power_consumption: Option<f64>,
}

impl Reading {
    /// A reading with only a timestamp; fill measurements with struct update syntax.
    #[must_use]
    pub fn at(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            temperature: None,
            humidity: None,
            pressure: None,
            fan_speed: None,
            power_consumption: None,
        }
    }

    /// Whether the reading carries anything worth charting.
    #[must_use]
    pub fn has_climate_data(&self) -> bool {
        self.temperature.is_some() || self.humidity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn should_deserialize_partial_reading() {
        let json = r#"{"timestamp": "2024-05-01T08:30:00Z", "humidity": 55.5}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.humidity, Some(55.5));
        assert!(reading.temperature.is_none());
        assert!(reading.has_climate_data());
    }

    #[test]
    fn should_deserialize_backend_reading_without_offset() {
        let json = r#"{
            "id": 42,
            "device_id": 7,
            "timestamp": "2024-05-01T08:30:00",
            "temperature": 21.5,
            "humidity": null,
            "pressure": 1013.2,
            "fan_speed": 60,
            "power_consumption": null
        }"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(
            reading.timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
        );
        assert_eq!(reading.fan_speed, Some(60.0));
        assert!(reading.humidity.is_none());
    }

    #[test]
    fn should_report_no_climate_data_when_only_power_present() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let reading = Reading {
            power_consumption: Some(120.0),
            fan_speed: Some(50.0),
            ..Reading::at(ts)
        };
        assert!(!reading.has_climate_data());
    }
}
