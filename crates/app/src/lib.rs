//! # swissairdry-app
//!
//! Application layer: the dashboard sync client and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceApi`: the external telemetry REST API
//!   - `Confirmation`: operator confirmation for disruptive actions
//! - Define the **driving/inbound** use-case struct:
//!   - `Dashboard`: polls the API, keeps the snapshot, issues commands with
//!     optimistic updates, and produces render instructions
//! - Provide **in-process infrastructure** that doesn't need IO: sequence
//!   guards, notifications, the settings store, pure view models
//!
//! ## Dependency rule
//! Depends on `swissairdry-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dashboard;
pub mod notifications;
pub mod ports;
pub mod sequence;
pub mod settings;
pub mod view;
