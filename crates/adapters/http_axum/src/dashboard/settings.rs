//! Settings page.

use askama::Template;
use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use swissairdry_app::notifications::NotificationKind;
use swissairdry_app::ports::DeviceApi;
use swissairdry_app::settings::{MqttSettings, Settings};

use super::{Layout, render};
use crate::state::AppState;

/// Settings page template.
#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    layout: Layout,
    settings: Settings,
}

impl IntoResponse for SettingsTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

/// Flat form fields of the settings page.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub api_url: String,
    pub mqtt_broker: String,
    pub mqtt_port: u16,
    pub mqtt_ws_port: u16,
}

impl From<SettingsForm> for Settings {
    fn from(form: SettingsForm) -> Self {
        Self {
            api_url: form.api_url.trim().to_string(),
            mqtt: MqttSettings {
                broker: form.mqtt_broker.trim().to_string(),
                port: form.mqtt_port,
                ws_port: form.mqtt_ws_port,
            },
        }
    }
}

/// `GET /settings`
pub async fn page<A>(State(state): State<AppState<A>>) -> SettingsTemplate
where
    A: DeviceApi + Send + Sync + 'static,
{
    SettingsTemplate {
        layout: Layout::still("Settings", "/settings", state.dashboard.notifications()),
        settings: state.settings.get(),
    }
}

/// `POST /settings`: validate, store and report the outcome as a notification.
pub async fn save<A>(State(state): State<AppState<A>>, Form(form): Form<SettingsForm>) -> Redirect
where
    A: DeviceApi + Send + Sync + 'static,
{
    match state.settings.replace(form.into()) {
        Ok(_) => {
            state
                .dashboard
                .notify(NotificationKind::Success, "Settings saved");
        }
        Err(err) => {
            tracing::warn!(error = %err, "rejected settings");
            state
                .dashboard
                .notify(NotificationKind::Error, format!("Failed to save settings: {err}"));
        }
    }
    Redirect::to("/settings")
}
