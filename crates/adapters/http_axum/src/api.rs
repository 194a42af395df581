//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod settings;

use axum::Router;
use axum::routing::get;

use swissairdry_app::ports::DeviceApi;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<A>() -> Router<AppState<A>>
where
    A: DeviceApi + Send + Sync + 'static,
{
    Router::new().route(
        "/settings",
        get(settings::get::<A>).post(settings::update::<A>),
    )
}
