//! [`DeviceApi`] implementation backed by [`reqwest`].

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use swissairdry_app::ports::DeviceApi;
use swissairdry_app::settings::SettingsStore;
use swissairdry_domain::command::{CommandAck, FanSpeed};
use swissairdry_domain::device::Device;
use swissairdry_domain::error::SwissAirDryError;
use swissairdry_domain::id::DeviceId;
use swissairdry_domain::reading::Reading;
use swissairdry_domain::status::SystemStatus;

use crate::config::HttpClientConfig;
use crate::error::HttpClientError;

/// HTTP client for the telemetry API.
#[derive(Debug, Clone)]
pub struct HttpDeviceApi {
    client: Client,
    settings: SettingsStore,
}

impl HttpDeviceApi {
    /// # Errors
    ///
    /// Returns [`HttpClientError::Build`] if the TLS backend fails to initialise.
    pub fn new(settings: SettingsStore, config: &HttpClientConfig) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(HttpClientError::Build)?;
        Ok(Self { client, settings })
    }

    /// Build `<api_url>/<segments...>`, encoding each segment on its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, HttpClientError> {
        let base = self.settings.api_base();
        let mut url =
            Url::parse(&base).map_err(|_| HttpClientError::InvalidBaseUrl(base.clone()))?;
        url.path_segments_mut()
            .map_err(|()| HttpClientError::InvalidBaseUrl(base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn device_endpoint(&self, id: &DeviceId, rest: &[&str]) -> Result<Url, HttpClientError> {
        let mut segments = vec!["api", "devices", id.as_str()];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, HttpClientError> {
        let response = request.send().await.map_err(HttpClientError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %response.url(), "non-success status");
            return Err(HttpClientError::Status(status.as_u16()));
        }
        response.json::<T>().await.map_err(HttpClientError::Decode)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, HttpClientError> {
        tracing::debug!(%url, "GET");
        Self::fetch(self.client.get(url)).await
    }

    async fn command(&self, url: Url, query: &[(&str, String)]) -> Result<CommandAck, HttpClientError> {
        tracing::debug!(%url, "POST");
        Self::fetch(self.client.post(url).query(query)).await
    }
}

impl DeviceApi for HttpDeviceApi {
    #[tracing::instrument(skip(self))]
    async fn list_devices(&self) -> Result<Vec<Device>, SwissAirDryError> {
        let url = self.endpoint(&["api", "devices"])?;
        Ok(self.get(url).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn system_status(&self) -> Result<SystemStatus, SwissAirDryError> {
        let url = self.endpoint(&["api", "system", "status"])?;
        Ok(self.get(url).await?)
    }

    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    async fn get_device(&self, id: &DeviceId) -> Result<Device, SwissAirDryError> {
        let url = self.device_endpoint(id, &[])?;
        Ok(self.get(url).await?)
    }

    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    async fn device_readings(
        &self,
        id: &DeviceId,
        limit: usize,
    ) -> Result<Vec<Reading>, SwissAirDryError> {
        let mut url = self.device_endpoint(id, &["readings"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        Ok(self.get(url).await?)
    }

    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    async fn set_power(&self, id: &DeviceId, on: bool) -> Result<CommandAck, SwissAirDryError> {
        let url = self.device_endpoint(id, &["control", "power"])?;
        Ok(self.command(url, &[("state", on.to_string())]).await?)
    }

    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    async fn set_fan_speed(
        &self,
        id: &DeviceId,
        speed: FanSpeed,
    ) -> Result<CommandAck, SwissAirDryError> {
        let url = self.device_endpoint(id, &["control", "fan"])?;
        Ok(self
            .command(url, &[("speed", speed.percent().to_string())])
            .await?)
    }

    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    async fn trigger_update(&self, id: &DeviceId) -> Result<CommandAck, SwissAirDryError> {
        let url = self.device_endpoint(id, &["trigger-update"])?;
        Ok(self.command(url, &[]).await?)
    }
}
