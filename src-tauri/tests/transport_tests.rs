mod support;

use std::time::Duration;

use clinic_desk::api::RequestOptions;
use clinic_desk::models::{HealthStatus, Patient};
use clinic_desk::ApiClient;
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::{json, Value};

use support::{unreachable_client, FakeBackend};

#[tokio::test]
async fn success_body_passes_through() {
    let backend = FakeBackend::start().await;
    backend.reply(
        "GET",
        "/patients",
        200,
        json!({
            "success": true,
            "message": "ok",
            "data": [{ "id": 1, "name": "Ravi Menon", "phone": 9876543210u64 }]
        }),
    );

    let response = backend.client().patients().list().await;

    assert!(response.success);
    assert_eq!(response.message.as_deref(), Some("ok"));
    let patients: Vec<Patient> = response.data.unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].name, "Ravi Menon");
    assert_eq!(patients[0].phone.as_deref(), Some("9876543210"));
}

#[tokio::test]
async fn failing_status_prefers_server_error() {
    let backend = FakeBackend::start().await;
    backend.reply(
        "DELETE",
        "/patients/9",
        404,
        json!({ "success": false, "error": "Patient not found" }),
    );

    let response = backend.client().patients().delete(9).await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Patient not found"));
    assert!(response.data.is_none());
}

#[tokio::test]
async fn failing_status_without_error_field_reports_status() {
    let backend = FakeBackend::start().await;
    backend.reply_raw("GET", "/billing", 500, "<html>Internal Server Error</html>");

    let response = backend.client().billing().list().await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("HTTP error! status: 500"));
}

#[tokio::test]
async fn empty_server_error_falls_back_to_status() {
    let backend = FakeBackend::start().await;
    backend.reply("GET", "/reports", 503, json!({ "success": false, "error": "" }));

    let response = backend.client().reports().list().await;

    assert_eq!(response.error.as_deref(), Some("HTTP error! status: 503"));
}

#[tokio::test]
async fn malformed_json_is_a_failure_envelope() {
    let backend = FakeBackend::start().await;
    backend.reply_raw("GET", "/prescriptions", 200, "{\"success\": tru");

    let response = backend.client().prescriptions().list().await;

    assert!(!response.success);
    assert!(!response.error_message().is_empty());
}

#[tokio::test]
async fn body_not_matching_schema_is_a_failure_envelope() {
    let backend = FakeBackend::start().await;
    backend.reply(
        "GET",
        "/patients",
        200,
        json!({ "success": true, "data": [{ "name": "No Id" }] }),
    );

    let response = backend.client().patients().list().await;

    assert!(!response.success);
    assert!(response.error_message().contains("id"));
}

#[tokio::test]
async fn server_reported_failure_with_ok_status_passes_through() {
    let backend = FakeBackend::start().await;
    backend.reply(
        "GET",
        "/analytics",
        200,
        json!({ "success": false, "error": "Workbook locked" }),
    );

    let response = backend.client().analytics().get().await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Workbook locked"));
}

#[tokio::test]
async fn unreachable_server_is_a_failure_envelope() {
    let response = unreachable_client().analytics().get().await;

    assert!(!response.success);
    assert!(!response.error_message().is_empty());
}

#[tokio::test]
async fn slow_server_hits_the_request_timeout() {
    let backend = FakeBackend::start().await;
    backend.reply_delayed(
        "GET",
        "/analytics",
        200,
        json!({ "success": true, "data": {} }),
        Duration::from_millis(800),
    );

    let response = backend
        .client_with_timeout(Duration::from_millis(100))
        .analytics()
        .get()
        .await;

    assert!(!response.success);
}

#[tokio::test]
async fn content_type_is_forced_and_extra_headers_are_kept() {
    let backend = FakeBackend::start().await;
    backend.reply("POST", "/notify", 200, json!({ "success": true }));

    let options = RequestOptions::new(Method::POST)
        .with_body(json!({ "message": "hi", "phone": "555" }))
        .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .with_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc-123"),
        );
    let response: clinic_desk::ApiResponse<Value> = backend.client().request("/notify", options).await;

    assert!(response.success);
    let recorded = backend.last("POST", "/notify");
    assert_eq!(recorded.content_type.as_deref(), Some("application/json"));
    assert_eq!(recorded.headers.get_all(CONTENT_TYPE.as_str()).iter().count(), 1);
    assert_eq!(
        recorded.headers.get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
    assert_eq!(recorded.json(), json!({ "message": "hi", "phone": "555" }));
}

#[tokio::test]
async fn get_requests_also_declare_json() {
    let backend = FakeBackend::start().await;
    backend.reply("GET", "/patients", 200, json!({ "success": true, "data": [] }));

    backend.client().patients().list().await;

    let recorded = backend.last("GET", "/patients");
    assert_eq!(recorded.content_type.as_deref(), Some("application/json"));
    assert!(recorded.body.is_empty());
}

#[tokio::test]
async fn health_body_is_wrapped() {
    let backend = FakeBackend::start().await;
    backend.reply(
        "GET",
        "/health",
        200,
        json!({ "status": "healthy", "timestamp": "2024-03-15T09:30:00.000001" }),
    );

    let response = backend.client().health_check().await;

    assert!(response.success);
    let health: HealthStatus = response.data.unwrap();
    assert!(health.is_healthy());
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let backend = FakeBackend::start().await;
    backend.reply("GET", "/patients", 200, json!({ "success": true, "data": [] }));

    let client = ApiClient::with_client(reqwest::Client::new(), &format!("{}/", backend.base_url));
    let response = client.patients().list().await;

    assert!(response.success);
    assert_eq!(client.url("/patients"), format!("{}/patients", backend.base_url));
}
