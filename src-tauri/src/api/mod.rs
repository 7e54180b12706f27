//! HTTP access to the clinic backend.
//!
//! Every call resolves to an [`ApiResponse`]: transport faults, failing statuses
//! and undecodable bodies are logged here and folded into a failure envelope, so
//! callers only ever branch on `success`.

mod analytics;
mod appointments;
mod notifications;
mod resources;

pub use analytics::AnalyticsApi;
pub use notifications::{delivery_receipt, NotificationsApi};
pub use resources::{Resource, ResourceClient};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::{
    ApiResponse, Appointment, BillingRecord, HealthStatus, Patient, Prescription, Report, Settings,
};

/// Method, JSON body and extra headers for one call. Defaults to a bodiless GET.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        RequestOptions {
            method,
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::with_client(http, &settings.api_base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Performs the call and decodes an envelope around `T`. Never fails.
    pub async fn request<T>(&self, endpoint: &str, options: RequestOptions) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        let result = self
            .execute(endpoint, options)
            .await
            .and_then(|body| serde_json::from_value::<ApiResponse<T>>(body).map_err(ApiError::from));
        self.settle(endpoint, result)
    }

    /// Like [`request`](Self::request) for endpoints whose body is not an envelope;
    /// a decoded body is wrapped as `{success: true, data: body}`.
    pub async fn request_bare<T>(&self, endpoint: &str, options: RequestOptions) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        let result = self
            .execute(endpoint, options)
            .await
            .and_then(|body| serde_json::from_value::<T>(body).map(ApiResponse::ok).map_err(ApiError::from));
        self.settle(endpoint, result)
    }

    pub async fn get<T>(&self, endpoint: &str) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::new(Method::GET)).await
    }

    pub async fn delete<T>(&self, endpoint: &str) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::new(Method::DELETE)).await
    }

    /// Serializes `body` as the JSON payload of a `method` call.
    pub async fn send_json<T, B>(&self, endpoint: &str, method: Method, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match serde_json::to_value(body) {
            Ok(value) => {
                self.request(endpoint, RequestOptions::new(method).with_body(value))
                    .await
            }
            Err(err) => self.settle(endpoint, Err(err.into())),
        }
    }

    pub fn patients(&self) -> ResourceClient<Patient> {
        ResourceClient::new(self.clone())
    }

    pub fn appointments(&self) -> ResourceClient<Appointment> {
        ResourceClient::new(self.clone())
    }

    pub fn billing(&self) -> ResourceClient<BillingRecord> {
        ResourceClient::new(self.clone())
    }

    pub fn reports(&self) -> ResourceClient<Report> {
        ResourceClient::new(self.clone())
    }

    pub fn prescriptions(&self) -> ResourceClient<Prescription> {
        ResourceClient::new(self.clone())
    }

    pub fn analytics(&self) -> AnalyticsApi {
        AnalyticsApi::new(self.clone())
    }

    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.clone())
    }

    /// Liveness probe. The health body is bare JSON, not an envelope.
    pub async fn health_check(&self) -> ApiResponse<HealthStatus> {
        self.request_bare("/health", RequestOptions::new(Method::GET)).await
    }

    async fn execute(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        let mut headers = options.headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!(method = %options.method, %url, "API call");
        let mut builder = self.http.request(options.method, &url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(serde_json::to_vec(&body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let server_error = serde_json::from_slice::<Value>(&bytes).ok().and_then(|body| {
                body.get("error")
                    .and_then(Value::as_str)
                    .filter(|e| !e.trim().is_empty())
                    .map(str::to_string)
            });
            return Err(match server_error {
                Some(message) => ApiError::Server(message),
                None => ApiError::Status(status.as_u16()),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn settle<T>(&self, endpoint: &str, result: Result<ApiResponse<T>, ApiError>) -> ApiResponse<T> {
        match result {
            Ok(response) => response,
            Err(err) => {
                warn!(endpoint, error = %err, "API call failed");
                ApiResponse::failure(err.into_message())
            }
        }
    }
}
