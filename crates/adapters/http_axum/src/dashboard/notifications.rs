//! Notification dismissal.

use axum::extract::{Form, Path, State};
use axum::response::Redirect;
use serde::Deserialize;

use swissairdry_app::notifications::NotificationId;
use swissairdry_app::ports::DeviceApi;

use super::return_path;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DismissForm {
    pub return_to: Option<String>,
}

/// `POST /notifications/{id}/dismiss`
///
/// Dismissing an already expired notification is not an error.
pub async fn dismiss<A>(
    State(state): State<AppState<A>>,
    Path(id): Path<u64>,
    Form(form): Form<DismissForm>,
) -> Redirect
where
    A: DeviceApi + Send + Sync + 'static,
{
    if !state.dashboard.dismiss_notification(NotificationId::from_raw(id)) {
        tracing::debug!(id, "notification already gone");
    }
    Redirect::to(&return_path(form.return_to.as_deref(), "/"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use swissairdry_app::notifications::NotificationKind;

    use crate::testing::{location, post_form, send, test_app};

    #[tokio::test]
    async fn should_dismiss_notification_and_redirect_back() {
        let (_api, state, app) = test_app();
        let id = state
            .dashboard
            .notify(NotificationKind::Info, "Heads up");

        let uri = format!("/notifications/{}/dismiss", id.value());
        let response = send(&app, post_form(&uri, "return_to=%2Fsettings")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/settings");
        assert!(state.dashboard.notifications().is_empty());
    }

    #[tokio::test]
    async fn should_redirect_home_when_notification_unknown() {
        let (_api, _state, app) = test_app();

        let response = send(&app, post_form("/notifications/99/dismiss", "")).await;

        assert_eq!(location(&response), "/");
    }
}
