//! # swissairdry-domain
//!
//! Pure domain model for the SwissAirDry device dashboard.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (drying units reported by the telemetry API)
//! - Define **Readings** (sensor samples belonging to one device)
//! - Define **System status** (aggregate online/offline counts)
//! - Define **Commands** (power, fan speed, OTA update) and their acknowledgements
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod device;
pub mod reading;
pub mod status;
