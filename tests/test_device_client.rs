//! Integration tests for the HTTP device client against a local fake device
//!
//! The fake device is a small axum router bound to an ephemeral port that
//! serves `/sensor` and records every `/update` query it receives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use planthabitat::{
    Dashboard, DashboardSettings, DataSource, DeviceError, FixedClock, HttpDeviceClient,
    RelayCommand, RelayWriter, TelemetrySource,
};
use tokio::net::TcpListener;

#[derive(Clone)]
struct FakeDevice {
    sensor_body: Arc<Mutex<(StatusCode, String)>>,
    updates: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeDevice {
    fn new(status: StatusCode, body: &str) -> Self {
        Self {
            sensor_body: Arc::new(Mutex::new((status, body.to_string()))),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn updates(&self) -> Vec<HashMap<String, String>> {
        self.updates.lock().unwrap().clone()
    }
}

async fn sensor(State(device): State<FakeDevice>) -> impl IntoResponse {
    let (status, body) = device.sensor_body.lock().unwrap().clone();
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
}

async fn update(
    State(device): State<FakeDevice>,
    Query(params): Query<HashMap<String, String>>,
) -> &'static str {
    device.updates.lock().unwrap().push(params);
    "OK"
}

/// Serve the fake device and return its base URL
async fn spawn_device(device: FakeDevice) -> String {
    let app = Router::new()
        .route("/sensor", get(sensor))
        .route("/update", get(update))
        .with_state(device);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_full_reading() {
    let device = FakeDevice::new(
        StatusCode::OK,
        r#"{"hum": 58.5, "water": 12.0, "soiltemp": 22.4, "soilph": 6.7}"#,
    );
    let client = HttpDeviceClient::new(spawn_device(device).await).unwrap();

    let reading = client.fetch_reading().await.unwrap();
    assert_eq!(reading.humidity_pct, Some(58.5));
    assert_eq!(reading.water_distance_cm, Some(12.0));
    assert_eq!(reading.water_temp_c, Some(22.4));
    assert_eq!(reading.soil_ph, Some(6.7));
}

#[tokio::test]
async fn test_fetch_partial_reading_leaves_fields_missing() {
    let device = FakeDevice::new(StatusCode::OK, r#"{"hum": 40}"#);
    let client = HttpDeviceClient::new(spawn_device(device).await).unwrap();

    let reading = client.fetch_reading().await.unwrap();
    assert_eq!(reading.humidity_pct, Some(40.0));
    assert!(reading.water_distance_cm.is_none());
    assert!(reading.water_temp_c.is_none());
    assert!(reading.soil_ph.is_none());
}

#[tokio::test]
async fn test_fetch_malformed_payload_is_decode_error() {
    let device = FakeDevice::new(StatusCode::OK, "not json");
    let client = HttpDeviceClient::new(spawn_device(device).await).unwrap();

    let result = client.fetch_reading().await;
    assert!(matches!(result, Err(DeviceError::Decode(_))), "{:?}", result);
}

#[tokio::test]
async fn test_fetch_non_object_payload_is_decode_error() {
    for body in ["[]", "[61, 5, 22, 7]", "42"] {
        let device = FakeDevice::new(StatusCode::OK, body);
        let client = HttpDeviceClient::new(spawn_device(device).await).unwrap();

        let result = client.fetch_reading().await;
        assert!(
            matches!(result, Err(DeviceError::Decode(_))),
            "body {}: {:?}",
            body,
            result
        );
    }
}

#[tokio::test]
async fn test_fetch_server_error_is_status_error() {
    let device = FakeDevice::new(StatusCode::INTERNAL_SERVER_ERROR, "{}");
    let client = HttpDeviceClient::new(spawn_device(device).await).unwrap();

    let result = client.fetch_reading().await;
    assert!(matches!(result, Err(DeviceError::Status(500))), "{:?}", result);
}

#[tokio::test]
async fn test_write_relay_sends_one_based_query() {
    let device = FakeDevice::new(StatusCode::OK, "{}");
    let client = HttpDeviceClient::new(spawn_device(device.clone()).await).unwrap();

    client
        .write_relay(RelayCommand::for_index(0, true))
        .await
        .unwrap();
    client
        .write_relay(RelayCommand::for_index(0, false))
        .await
        .unwrap();

    let updates = device.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].get("relay").map(String::as_str), Some("1"));
    assert_eq!(updates[0].get("state").map(String::as_str), Some("1"));
    assert_eq!(updates[1].get("relay").map(String::as_str), Some("1"));
    assert_eq!(updates[1].get("state").map(String::as_str), Some("0"));
}

#[tokio::test]
async fn test_live_dashboard_polls_and_toggles() {
    let device = FakeDevice::new(
        StatusCode::OK,
        r#"{"hum": 70, "water": 15, "soiltemp": 21, "soilph": 6.2}"#,
    );
    let base_url = spawn_device(device.clone()).await;
    let source = DataSource::live(HttpDeviceClient::new(base_url).unwrap());
    let settings = DashboardSettings {
        poll_interval: Duration::from_millis(50),
        ..DashboardSettings::default()
    };
    let clock = Arc::new(FixedClock::from_display("2024-06-01 08:00").unwrap());
    let mut dashboard = Dashboard::mount(source, settings, clock);

    let state = tokio::time::timeout(Duration::from_secs(5), dashboard.next_event())
        .await
        .expect("poll within timeout")
        .expect("poller running");
    assert_eq!(state.reading.humidity_pct, Some(70.0));

    let view = dashboard.view();
    assert_eq!(view.water_level_percent, 50.0);

    dashboard.toggle(0).unwrap().await.unwrap();
    assert!(dashboard.state().actuators.get(0).unwrap().on);

    let updates = device.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].get("state").map(String::as_str), Some("1"));

    dashboard.unmount();
}
