//! Control forms: power, fan speed, OTA update and manual refresh.

use askama::Template;
use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use swissairdry_app::dashboard::OTA_PROMPT;
use swissairdry_app::ports::DeviceApi;
use swissairdry_app::view;
use swissairdry_domain::command::FanSpeed;
use swissairdry_domain::error::{NotFoundError, SwissAirDryError};
use swissairdry_domain::id::DeviceId;

use super::{Layout, render, return_path};
use crate::error::WebError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PowerForm {
    pub state: bool,
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FanForm {
    pub speed: u16,
    pub return_to: Option<String>,
}

/// Anything but `confirm=yes` declines.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub confirm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshForm {
    pub return_to: Option<String>,
}

/// OTA confirmation page template.
#[derive(Template)]
#[template(path = "update_confirm.html")]
pub struct UpdateConfirmTemplate {
    layout: Layout,
    name: String,
    prompt: &'static str,
    action: String,
    cancel_href: String,
}

impl IntoResponse for UpdateConfirmTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

/// `POST /devices/{id}/power`
pub async fn power<A>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
    Form(form): Form<PowerForm>,
) -> Result<Redirect, WebError>
where
    A: DeviceApi + Send + Sync + 'static,
{
    let id = DeviceId::new(id)?;
    state.dashboard.toggle_device_power(&id, form.state).await;
    let target = return_path(form.return_to.as_deref(), &view::detail_href(&id));
    Ok(Redirect::to(&target))
}

/// `POST /devices/{id}/fan`
pub async fn fan<A>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
    Form(form): Form<FanForm>,
) -> Result<Redirect, WebError>
where
    A: DeviceApi + Send + Sync + 'static,
{
    let id = DeviceId::new(id)?;
    let speed = FanSpeed::new(form.speed)?;
    state.dashboard.set_fan_speed(&id, speed).await;
    let target = return_path(form.return_to.as_deref(), &view::detail_href(&id));
    Ok(Redirect::to(&target))
}

/// `GET /devices/{id}/update`: ask before flashing firmware.
pub async fn confirm_update<A>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
) -> Result<UpdateConfirmTemplate, WebError>
where
    A: DeviceApi + Send + Sync + 'static,
{
    let id = DeviceId::new(id)?;
    let device = state
        .dashboard
        .devices()
        .unwrap_or_default()
        .into_iter()
        .chain(state.dashboard.selected_device())
        .find(|device| device.device_id == id)
        .ok_or_else(|| {
            SwissAirDryError::from(NotFoundError {
                entity: "Device",
                id: id.to_string(),
            })
        })?;

    Ok(UpdateConfirmTemplate {
        layout: Layout::still(
            "Confirm update",
            view::action_href(id.as_str(), "update"),
            state.dashboard.notifications(),
        ),
        name: device.name,
        prompt: OTA_PROMPT,
        action: view::action_href(id.as_str(), "update"),
        cancel_href: view::detail_href(&id),
    })
}

/// `POST /devices/{id}/update`
pub async fn update<A>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
    Form(form): Form<UpdateForm>,
) -> Result<Redirect, WebError>
where
    A: DeviceApi + Send + Sync + 'static,
{
    let id = DeviceId::new(id)?;
    let confirmed = form.confirm.as_deref() == Some("yes");
    state.dashboard.trigger_ota_update(&id, &confirmed).await;
    Ok(Redirect::to(&view::detail_href(&id)))
}

/// `POST /refresh`
pub async fn refresh<A>(
    State(state): State<AppState<A>>,
    Form(form): Form<RefreshForm>,
) -> Redirect
where
    A: DeviceApi + Send + Sync + 'static,
{
    state.dashboard.manual_refresh().await;
    Redirect::to(&return_path(form.return_to.as_deref(), "/"))
}
