use reqwest::Method;
use serde_json::Value;

use super::ApiClient;
use crate::models::{ApiResponse, DeliveryReceipt, NotificationRequest};

const RECEIPT_FIELD: &str = "whatsapp_response";

#[derive(Debug, Clone)]
pub struct NotificationsApi {
    api: ApiClient,
}

impl NotificationsApi {
    pub fn new(api: ApiClient) -> Self {
        NotificationsApi { api }
    }

    /// `POST /notify`. Success only means the backend accepted the message.
    pub async fn send(&self, message: &str, phone: &str, patient_id: Option<i64>) -> ApiResponse<Value> {
        let request = NotificationRequest {
            message: message.to_string(),
            phone: phone.to_string(),
            patient_id,
        };
        self.api.send_json("/notify", Method::POST, &request).await
    }
}

/// Delivery details carried beside the envelope, if the backend sent any.
pub fn delivery_receipt<T>(response: &ApiResponse<T>) -> Option<DeliveryReceipt> {
    response
        .extra
        .get(RECEIPT_FIELD)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}
