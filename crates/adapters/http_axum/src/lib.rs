//! # swissairdry-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **server-side-rendered HTML dashboard** from the
//!   [`Dashboard`](swissairdry_app::dashboard::Dashboard) snapshot, with
//!   zero JavaScript: controls are `<form>` elements that POST and redirect
//!   (PRG pattern), pages reload through `<meta http-equiv="refresh">`
//! - Serve the settings JSON API (`/api/settings`)
//! - Map application errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `swissairdry-app` for the dashboard and settings store and on
//! `swissairdry-domain` for request parsing. Never leaks axum types into
//! the domain.

pub mod api;
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
