//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// UTC timestamp used for `last_seen`, reading times, render stamps, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an API timestamp.
///
/// RFC 3339 values are converted to UTC. Values without an offset (the
/// telemetry backend stores naive datetimes) are read as UTC.
///
/// # Errors
///
/// Returns the last parse error when no accepted format matches.
pub fn parse(raw: &str) -> Result<Timestamp, chrono::ParseError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` helper accepting both offset and naive timestamps.
///
/// # Errors
///
/// Fails when the value is not a string or matches no accepted format.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Same as [`deserialize`] for an optional (nullable) field.
///
/// # Errors
///
/// Fails when a present value matches no accepted format.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// Human-readable rendering used by the dashboard tables.
#[must_use]
pub fn format_local(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Clock-only rendering for "last updated" stamps.
#[must_use]
pub fn format_clock(ts: &Timestamp) -> String {
    ts.format("%H:%M:%S").to_string()
}
