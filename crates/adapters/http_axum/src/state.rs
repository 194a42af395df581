//! Shared application state for axum handlers.

use std::time::Duration;

use swissairdry_app::dashboard::Dashboard;
use swissairdry_app::settings::SettingsStore;

/// Application state shared across all axum handlers.
///
/// Generic over the device API client to avoid dynamic dispatch.
/// `Clone` is implemented manually so `A` itself does not need to be
/// `Clone`; the dashboard and settings store are shared handles.
pub struct AppState<A> {
    /// The sync client owning the snapshot every page renders from.
    pub dashboard: Dashboard<A>,
    /// Runtime settings, edited from the settings page and API.
    pub settings: SettingsStore,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            dashboard: self.dashboard.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<A> AppState<A> {
    pub fn new(dashboard: Dashboard<A>, settings: SettingsStore) -> Self {
        Self {
            dashboard,
            settings,
        }
    }

    /// Reload period of the live pages, matching the background refresh.
    #[must_use]
    pub fn page_refresh(&self) -> Duration {
        self.dashboard.options().refresh_interval
    }
}
