//! JSON handlers for runtime settings.

use axum::Json;
use axum::extract::State;

use swissairdry_app::ports::DeviceApi;
use swissairdry_app::settings::Settings;

use crate::error::WebError;
use crate::state::AppState;

/// `GET /api/settings`
pub async fn get<A>(State(state): State<AppState<A>>) -> Json<Settings>
where
    A: DeviceApi + Send + Sync + 'static,
{
    Json(state.settings.get())
}

/// `POST /api/settings`: missing fields take their defaults.
pub async fn update<A>(
    State(state): State<AppState<A>>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, WebError>
where
    A: DeviceApi + Send + Sync + 'static,
{
    let stored = state.settings.replace(settings)?;
    Ok(Json(stored))
}
