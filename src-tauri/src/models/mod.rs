mod analytics;
mod appointment;
mod records;
mod settings;

pub use analytics::{Analytics, DeliveryReceipt, HealthStatus, NotificationRequest};
pub use appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment, RescheduleDraft};
pub use records::{
    BillingPatch, BillingRecord, NewBillingRecord, NewPatient, NewPrescription, NewReport, Patient, PatientPatch,
    Prescription, PrescriptionPatch, Report, ReportPatch,
};
pub use settings::{BackendConfig, MutationErrorPolicy, Settings, DEFAULT_API_BASE_URL};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::UNKNOWN_ERROR;

/// The `{success, data?, message?, error?}` wrapper every backend response uses.
///
/// `success` is the discriminant; `data` may legitimately be absent on success
/// (updates and deletes only carry a `message`). Top-level fields outside the
/// envelope are kept in `extra` so the server body is passed through intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            extra: Map::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            extra: Map::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The failure text, or the generic fallback when the server sent none.
    pub fn error_message(&self) -> &str {
        self.error
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(UNKNOWN_ERROR)
    }

    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error_message().to_string())
        }
    }
}
