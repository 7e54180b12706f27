//! In-process stand-in for the clinic API server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use clinic_desk::ApiClient;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct Shared {
    routes: Mutex<HashMap<(String, String), Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct FakeBackend {
    pub base_url: String,
    shared: Arc<Shared>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let app = Router::new().fallback(handle).with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        FakeBackend {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    pub fn client(&self) -> ApiClient {
        self.client_with_timeout(Duration::from_secs(5))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> ApiClient {
        let http = reqwest::Client::builder().timeout(timeout).build().unwrap();
        ApiClient::with_client(http, &self.base_url)
    }

    pub fn reply(&self, method: &str, path: &str, status: u16, body: Value) {
        self.reply_raw(method, path, status, &body.to_string());
    }

    pub fn reply_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.insert(method, path, status, body, Duration::ZERO);
    }

    pub fn reply_delayed(&self, method: &str, path: &str, status: u16, body: Value, delay: Duration) {
        self.insert(method, path, status, &body.to_string(), delay);
    }

    fn insert(&self, method: &str, path: &str, status: u16, body: &str, delay: Duration) {
        self.shared.routes.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            Reply {
                status,
                body: body.to_string(),
                delay,
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last(&self, method: &str, path: &str) -> Recorded {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .last()
            .unwrap_or_else(|| panic!("no {} {} recorded", method, path))
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    shared.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        headers: headers.clone(),
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let reply = shared
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned();
    let Some(reply) = reply else {
        return (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            json!({ "success": false, "error": "Not found" }).to_string(),
        )
            .into_response();
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (
        StatusCode::from_u16(reply.status).unwrap(),
        [(CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

pub fn appointment(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "patient_id": id * 10,
        "patient_name": format!("Patient {}", id),
        "appointment_date": "2024-03-15",
        "appointment_time": "14:30",
        "status": status,
        "reason": "Checkup",
        "notes": null,
        "created_date": "2024-03-01 09:00:00"
    })
}

pub fn analytics(total: u64, todays: Vec<Value>) -> Value {
    json!({
        "success": true,
        "data": {
            "total_appointments": total,
            "pending_billing": 2,
            "active_patients": 3,
            "avg_wait_time": "12m",
            "todays_appointments": todays,
            "revenue_trend": "Stable",
            "follow_up_alerts": 1
        }
    })
}

pub fn unreachable_client() -> ApiClient {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    ApiClient::with_client(http, "http://127.0.0.1:1")
}
