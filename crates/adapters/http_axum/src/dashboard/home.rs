//! Dashboard home page: status summary and device list.

use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use swissairdry_app::ports::DeviceApi;
use swissairdry_app::view::{DeviceListView, StatusView};

use super::{Layout, render};
use crate::state::AppState;

/// Home page template.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    layout: Layout,
    status: Option<StatusView>,
    devices: Option<DeviceListView>,
}

impl IntoResponse for IndexTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

/// `GET /`
pub async fn index<A>(State(state): State<AppState<A>>) -> IndexTemplate
where
    A: DeviceApi + Send + Sync + 'static,
{
    let screen = state.dashboard.screen();
    IndexTemplate {
        layout: Layout::live("Dashboard", "/", state.page_refresh(), screen.notifications),
        status: screen.status,
        devices: screen.device_list,
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{body_text, get, send, test_app};

    #[tokio::test]
    async fn should_render_loading_state_before_first_refresh() {
        let (_api, _state, app) = test_app();

        let body = body_text(send(&app, get("/")).await).await;

        assert!(body.contains(r#"<meta http-equiv="refresh" content="30">"#));
        assert!(body.contains("Loading devices"));
    }

    #[tokio::test]
    async fn should_render_status_and_cards_after_refresh() {
        let (_api, state, app) = test_app();
        state.dashboard.refresh().await;

        let body = body_text(send(&app, get("/")).await).await;

        assert!(body.contains("Basement dryer"));
        assert!(body.contains("Attic dryer"));
        assert!(body.contains(r#"class="badge online""#));
        assert!(body.contains(r#"class="badge offline""#));
        assert!(body.contains(r#"<span class="stat-value">2</span>"#));
    }

    #[tokio::test]
    async fn should_render_empty_state_when_no_devices() {
        let (api, state, app) = test_app();
        api.clear_devices();
        state.dashboard.load_devices().await;

        let body = body_text(send(&app, get("/")).await).await;

        assert!(body.contains("No devices found"));
    }
}
