//! End-to-end smoke tests for the full swissairdryd stack.
//!
//! Each test starts a stub telemetry API on a loopback port, wires the real
//! reqwest client, dashboard and axum router to it, and exercises the HTTP
//! layer via `tower::ServiceExt::oneshot`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode, header};
use axum::routing::{get, post};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use swissairdry_adapter_http_axum::router;
use swissairdry_adapter_http_axum::state::AppState;
use swissairdry_adapter_http_client::{HttpClientConfig, HttpDeviceApi};
use swissairdry_app::dashboard::{Dashboard, DashboardOptions};
use swissairdry_app::settings::{Settings, SettingsStore};
use tower::ServiceExt;

#[derive(Clone, Default)]
struct Upstream {
    requests: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl Upstream {
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }
}

async fn list_devices(State(upstream): State<Upstream>) -> Result<Json<Value>, StatusCode> {
    upstream.requests.lock().unwrap().push("GET /api/devices".to_string());
    if *upstream.failing.lock().unwrap() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!([
        { "device_id": "sad-001", "name": "Basement dryer", "type": "dehumidifier", "firmware_version": "1.4.2", "is_online": true },
        { "device_id": "sad-002", "name": "Attic dryer", "type": "dehumidifier", "is_online": false }
    ])))
}

async fn system_status() -> Json<Value> {
    Json(json!({ "total_devices": 2, "online_devices": 1, "offline_devices": 1 }))
}

async fn get_device(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "device_id": id, "name": "Basement dryer", "type": "dehumidifier", "is_online": true, "ip_address": "10.0.0.21" }))
}

async fn readings() -> Json<Value> {
    Json(json!([
        { "timestamp": "2024-03-01T10:05:00Z", "temperature": 21.5, "humidity": 48.0, "fan_speed": 75.0 },
        { "timestamp": "2024-03-01T10:00:00Z", "temperature": 22.0, "humidity": 51.0, "fan_speed": 75.0 }
    ]))
}

async fn power(
    State(upstream): State<Upstream>,
    Path(id): Path<String>,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    upstream
        .requests
        .lock()
        .unwrap()
        .push(format!("POST /api/devices/{id}/control/power?state={}", query["state"]));
    Json(json!({ "message": format!("Device {id} power updated") }))
}

async fn serve_upstream(upstream: Upstream) -> SocketAddr {
    let router = Router::new()
        .route("/api/devices", get(list_devices))
        .route("/api/system/status", get(system_status))
        .route("/api/devices/{id}", get(get_device))
        .route("/api/devices/{id}/readings", get(readings))
        .route("/api/devices/{id}/control/power", post(power))
        .with_state(upstream);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

struct Stack {
    upstream: Upstream,
    state: AppState<HttpDeviceApi>,
    app: Router,
}

/// Build a fully-wired router against a fresh stub upstream.
async fn stack() -> Stack {
    let upstream = Upstream::default();
    let addr = serve_upstream(upstream.clone()).await;
    let settings = SettingsStore::new(Settings {
        api_url: format!("http://{addr}"),
        ..Settings::default()
    })
    .expect("stub settings should be valid");
    let api = HttpDeviceApi::new(settings.clone(), &HttpClientConfig::default())
        .expect("client should build");
    let options = DashboardOptions {
        settle_delay: Duration::from_millis(50),
        ..DashboardOptions::default()
    };
    let state = AppState::new(Dashboard::new(api, options), settings);
    let app = router::build(state.clone());
    Stack {
        upstream,
        state,
        app,
    }
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let stack = stack().await;

    let resp = stack.app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Dashboard (SSR) pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_render_devices_from_upstream_after_refresh() {
    let stack = stack().await;
    stack.state.dashboard.refresh().await;

    let resp = stack.app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Basement dryer"));
    assert!(body.contains("Attic dryer"));
    assert!(body.contains("Total devices"));
}

#[tokio::test]
async fn should_keep_devices_and_show_error_when_upstream_fails() {
    let stack = stack().await;
    stack.state.dashboard.load_devices().await;
    stack.upstream.fail();
    stack.state.dashboard.load_devices().await;

    let body = body_text(stack.app.oneshot(get_request("/")).await.unwrap()).await;

    assert!(body.contains("Basement dryer"));
    assert!(body.contains("Failed to load devices: HTTP error! status: 500"));
}

#[tokio::test]
async fn should_render_detail_readings_and_reported_fan_speed() {
    let stack = stack().await;

    let resp = stack
        .app
        .oneshot(get_request("/devices?device=sad-001"))
        .await
        .unwrap();

    let body = body_text(resp).await;
    assert!(body.contains("10.0.0.21"));
    assert!(body.contains("21.5°C"));
    assert!(body.contains(r#"<strong class="fan-display">75%</strong>"#));
    assert!(body.contains("<polyline"));
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_forward_power_command_and_reconcile() {
    let stack = stack().await;

    let resp = stack
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/devices/sad-002/power")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("state=true"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        stack.upstream.requests(),
        ["POST /api/devices/sad-002/control/power?state=true"]
    );

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(
        stack
            .upstream
            .requests()
            .contains(&"GET /api/devices".to_string())
    );
}

// ---------------------------------------------------------------------------
// Settings API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_point_client_at_new_api_url() {
    let stack = stack().await;
    let other = Upstream::default();
    let other_addr = serve_upstream(other.clone()).await;

    let resp = stack
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/settings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "api_url": format!("http://{other_addr}") }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    stack.state.dashboard.load_devices().await;

    assert!(stack.upstream.requests().is_empty());
    assert_eq!(other.requests(), ["GET /api/devices"]);
}

#[tokio::test]
async fn should_reject_invalid_settings() {
    let stack = stack().await;

    let resp = stack
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/settings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"api_url": "not a url"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
