//! Server-side rendered HTML dashboard (no JavaScript).
//!
//! Every page renders from [`Dashboard::screen`](swissairdry_app::dashboard::Dashboard::screen).
//! Live pages include `<meta http-equiv="refresh">` with the background
//! refresh period. Forms POST and redirect back (PRG pattern).

#[allow(clippy::missing_errors_doc)]
pub mod controls;
pub mod devices;
pub mod home;
pub mod notifications;
pub mod settings;

use std::time::Duration;

use askama::Template;
use axum::Router;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};

use swissairdry_app::notifications::Notification;
use swissairdry_app::ports::DeviceApi;

use crate::error::WebError;
use crate::state::AppState;

/// Build the dashboard sub-router for SSR HTML pages.
pub fn routes<A>() -> Router<AppState<A>>
where
    A: DeviceApi + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home::index::<A>))
        .route("/devices", get(devices::page::<A>))
        .route("/refresh", post(controls::refresh::<A>))
        .route("/devices/{id}/power", post(controls::power::<A>))
        .route("/devices/{id}/fan", post(controls::fan::<A>))
        .route(
            "/devices/{id}/update",
            get(controls::confirm_update::<A>).post(controls::update::<A>),
        )
        .route(
            "/notifications/{id}/dismiss",
            post(notifications::dismiss::<A>),
        )
        .route("/settings", get(settings::page::<A>).post(settings::save::<A>))
}

/// Page chrome shared by every template (see `base.html`).
pub struct Layout {
    pub title: &'static str,
    /// `None` disables the automatic reload.
    pub refresh_seconds: Option<u64>,
    pub notifications: Vec<Notification>,
    /// Where forms on this page redirect back to.
    pub current_path: String,
}

impl Layout {
    /// Chrome for a page that reloads on the refresh period.
    pub fn live(
        title: &'static str,
        current_path: impl Into<String>,
        refresh: Duration,
        notifications: Vec<Notification>,
    ) -> Self {
        Self {
            title,
            refresh_seconds: Some(refresh.as_secs().max(1)),
            notifications,
            current_path: current_path.into(),
        }
    }

    /// Chrome for a page holding a form the operator is filling in.
    pub fn still(
        title: &'static str,
        current_path: impl Into<String>,
        notifications: Vec<Notification>,
    ) -> Self {
        Self {
            title,
            refresh_seconds: None,
            notifications,
            current_path: current_path.into(),
        }
    }
}

/// Render a template into an HTML response.
pub(crate) fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => WebError::from(err).into_response(),
    }
}

/// Redirect target submitted by a form, restricted to paths on this site.
pub(crate) fn return_path(requested: Option<&str>, fallback: &str) -> String {
    match requested {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") => {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}
