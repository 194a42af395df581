//! Devices page: device list plus the detail panel of `?device=ID`.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use swissairdry_app::ports::DeviceApi;
use swissairdry_app::view::{self, DeviceDetailView, DeviceListView, ReadingsView};
use swissairdry_domain::id::DeviceId;

use super::{Layout, render};
use crate::chart::SvgChart;
use crate::state::AppState;

/// Devices page template.
#[derive(Template)]
#[template(path = "devices.html")]
pub struct DevicesTemplate {
    layout: Layout,
    devices: Option<DeviceListView>,
    detail: Option<DeviceDetailView>,
    readings: Option<ReadingsView>,
    chart: Option<SvgChart>,
}

impl IntoResponse for DevicesTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

#[derive(Debug, Deserialize)]
pub struct DevicesQuery {
    pub device: Option<String>,
}

/// `GET /devices?device=ID`
pub async fn page<A>(
    State(state): State<AppState<A>>,
    Query(query): Query<DevicesQuery>,
) -> DevicesTemplate
where
    A: DeviceApi + Send + Sync + 'static,
{
    state
        .dashboard
        .open_from_query(query.device.as_deref())
        .await;
    let requested = query
        .device
        .as_deref()
        .and_then(|raw| DeviceId::new(raw).ok());

    let screen = state.dashboard.screen();
    let current_path = requested
        .as_ref()
        .map_or_else(|| "/devices".to_string(), view::detail_href);
    let (detail, readings) = if requested.is_some() {
        (screen.detail, screen.readings)
    } else {
        (None, None)
    };
    let chart = readings
        .as_ref()
        .and_then(ReadingsView::chart)
        .map(SvgChart::from_view);

    DevicesTemplate {
        layout: Layout::live(
            "Devices",
            current_path,
            state.page_refresh(),
            screen.notifications,
        ),
        devices: screen.device_list,
        detail,
        readings,
        chart,
    }
}
