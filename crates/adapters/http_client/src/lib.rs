//! # swissairdry-adapter-http-client
//!
//! Driven adapter implementing [`DeviceApi`](swissairdry_app::ports::DeviceApi)
//! over HTTP with [reqwest](https://docs.rs/reqwest).
//!
//! The base URL is read from the shared
//! [`SettingsStore`](swissairdry_app::settings::SettingsStore) on every
//! request, so changes made on the settings page apply to the next call.
//! Device ids are percent-encoded as single path segments.

pub mod client;
pub mod config;
pub mod error;

pub use client::HttpDeviceApi;
pub use config::HttpClientConfig;
pub use error::HttpClientError;
