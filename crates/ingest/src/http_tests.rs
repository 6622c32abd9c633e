use axum_test::TestServer;
use healthmonitor_core::bus::InMemoryPublisher;
use healthmonitor_core::domain::VitalBounds;
use healthmonitor_core::store::InMemoryStore;
use serde_json::json;

use super::*;

fn bounds() -> SanityBounds {
    SanityBounds {
        temp: VitalBounds { low: 35.0, high: 38.0 },
        heart_rate: VitalBounds { low: 60.0, high: 100.0 },
        ecg: VitalBounds { low: 60.0, high: 100.0 },
        spo2: VitalBounds { low: 94.0, high: 100.0 },
    }
}

fn test_server() -> TestServer {
    let state = Arc::new(IngestState {
        store: Arc::new(InMemoryStore::new()),
        bus: InMemoryPublisher::new(),
        sanity_bounds: bounds(),
    });
    TestServer::new(build_router(state)).expect("build test server")
}

#[tokio::test]
async fn health_reports_running() {
    let server = test_server();
    let resp = server.get("/api/v1/health").await;
    resp.assert_status_ok();
    resp.assert_json(&json!({ "status": "running" }));
}

#[tokio::test]
async fn register_then_duplicate_is_conflict() {
    let server = test_server();
    let resp = server.post("/api/v1/devices").json(&json!({ "did": "d1", "patient_name": "Alice" })).await;
    resp.assert_status_ok();

    let dup = server.post("/api/v1/devices").json(&json!({ "did": "d1", "patient_name": "Alice" })).await;
    dup.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_unknown_device_is_not_found() {
    let server = test_server();
    let resp = server.patch("/api/v1/devices/unknown").json(&json!({ "patient_name": "Bob" })).await;
    resp.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_patches_patient_name_and_phones() {
    let server = test_server();
    server.post("/api/v1/devices").json(&json!({ "did": "d1", "patient_name": "Alice" })).await.assert_status_ok();

    let resp = server
        .patch("/api/v1/devices/d1")
        .json(&json!({ "patient_name": "Alice Smith", "subscribed_phones": ["+15550000"] }))
        .await;
    resp.assert_status_ok();
}

#[tokio::test]
async fn ingest_requires_registration_first() {
    let server = test_server();
    let resp = server
        .post("/api/v1/devices/d1/samples")
        .json(&json!([{ "ts": "2024-01-01T00:00:00Z", "temperature": 36.5, "heart_rate": 75.0, "ecg": 80.0, "spo2": 98.0 }]))
        .await;
    resp.assert_status_not_ok();
}

#[tokio::test]
async fn ingest_accepts_a_normal_batch_and_publishes_validation() {
    let server = test_server();
    server.post("/api/v1/devices").json(&json!({ "did": "d1", "patient_name": "Alice" })).await.assert_status_ok();

    let resp = server
        .post("/api/v1/devices/d1/samples")
        .json(&json!([
            { "ts": "2024-01-01T00:00:00Z", "temperature": 36.5, "heart_rate": 75.0, "ecg": 80.0, "spo2": 98.0 },
            { "ts": "2024-01-01T00:01:00Z", "temperature": 39.0, "heart_rate": 75.0, "ecg": 80.0, "spo2": 98.0 },
        ]))
        .await;
    resp.assert_status_ok();
    resp.assert_json(&json!({ "did": "d1", "accepted": 2 }));
}

#[tokio::test]
async fn ingest_rejects_an_entirely_nonsensical_batch() {
    let server = test_server();
    server.post("/api/v1/devices").json(&json!({ "did": "d1", "patient_name": "Alice" })).await.assert_status_ok();

    let resp = server
        .post("/api/v1/devices/d1/samples")
        .json(&json!([{ "ts": "2024-01-01T00:00:00Z", "temperature": -999.0, "heart_rate": -999.0, "ecg": -999.0, "spo2": -999.0 }]))
        .await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
}
