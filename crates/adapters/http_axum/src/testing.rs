//! Fixtures shared by the handler tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use swissairdry_app::dashboard::{Dashboard, DashboardOptions};
use swissairdry_app::ports::DeviceApi;
use swissairdry_app::settings::{Settings, SettingsStore};
use swissairdry_domain::command::{CommandAck, FanSpeed};
use swissairdry_domain::device::Device;
use swissairdry_domain::error::{ApiError, SwissAirDryError};
use swissairdry_domain::id::DeviceId;
use swissairdry_domain::reading::Reading;
use swissairdry_domain::status::SystemStatus;
use swissairdry_domain::time;

use crate::state::AppState;

/// In-memory API with two dryers, one online.
pub(crate) struct StubApi {
    devices: Mutex<Vec<Device>>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    fn new() -> Self {
        let devices = vec![
            Device::builder()
                .device_id("sad-001")
                .name("Basement dryer")
                .device_type("dehumidifier")
                .firmware_version("1.4.2")
                .online(true)
                .build()
                .unwrap(),
            Device::builder()
                .device_id("sad-002")
                .name("Attic dryer")
                .device_type("dehumidifier")
                .build()
                .unwrap(),
        ];
        Self {
            devices: Mutex::new(devices),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn clear_devices(&self) {
        self.devices.lock().unwrap().clear();
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn ack(message: String) -> Result<CommandAck, SwissAirDryError> {
        Ok(CommandAck { message })
    }
}

impl DeviceApi for StubApi {
    async fn list_devices(&self) -> Result<Vec<Device>, SwissAirDryError> {
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn system_status(&self) -> Result<SystemStatus, SwissAirDryError> {
        let devices = self.devices.lock().unwrap();
        let online = devices.iter().filter(|d| d.is_online).count();
        let online = u32::try_from(online).unwrap();
        let total = u32::try_from(devices.len()).unwrap();
        Ok(SystemStatus {
            total_devices: total,
            online_devices: online,
            offline_devices: total - online,
        })
    }

    async fn get_device(&self, id: &DeviceId) -> Result<Device, SwissAirDryError> {
        self.devices
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.device_id == *id)
            .cloned()
            .ok_or_else(|| ApiError::Status(404).into())
    }

    async fn device_readings(
        &self,
        _id: &DeviceId,
        limit: usize,
    ) -> Result<Vec<Reading>, SwissAirDryError> {
        let now = time::now();
        let readings = (0..limit.min(3))
            .map(|i| Reading {
                temperature: Some(21.5 - f64::from(u8::try_from(i).unwrap())),
                humidity: Some(48.0),
                fan_speed: Some(50.0),
                ..Reading::at(now - chrono::Duration::minutes(i64::try_from(i).unwrap()))
            })
            .collect();
        Ok(readings)
    }

    async fn set_power(&self, id: &DeviceId, on: bool) -> Result<CommandAck, SwissAirDryError> {
        self.record(format!("power {id} {on}"));
        Self::ack(format!("Device {id} turned {}", if on { "on" } else { "off" }))
    }

    async fn set_fan_speed(
        &self,
        id: &DeviceId,
        speed: FanSpeed,
    ) -> Result<CommandAck, SwissAirDryError> {
        self.record(format!("fan {id} {}", speed.percent()));
        Self::ack(format!("Fan speed set to {speed}"))
    }

    async fn trigger_update(&self, id: &DeviceId) -> Result<CommandAck, SwissAirDryError> {
        self.record(format!("update {id}"));
        Self::ack(format!("OTA update triggered for {id}"))
    }
}

pub(crate) fn test_app() -> (Arc<StubApi>, AppState<StubApi>, Router) {
    let api = Arc::new(StubApi::new());
    let dashboard = Dashboard::from_arc(Arc::clone(&api), DashboardOptions::default());
    let settings = SettingsStore::new(Settings::default()).unwrap();
    let state = AppState::new(dashboard, settings);
    let app = crate::router::build(state.clone());
    (api, state, app)
}

pub(crate) async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub(crate) fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}
