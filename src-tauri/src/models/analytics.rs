use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Appointment;
use crate::utils::lenient;

/// Aggregate regenerated by the server on every fetch. Replaces the previous copy wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default, deserialize_with = "lenient::total")]
    pub total_appointments: u64,
    #[serde(default, deserialize_with = "lenient::total")]
    pub pending_billing: u64,
    #[serde(default, deserialize_with = "lenient::total")]
    pub active_patients: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub avg_wait_time: String,
    #[serde(default, deserialize_with = "lenient::rows")]
    pub todays_appointments: Vec<Appointment>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub revenue_trend: String,
    #[serde(default, deserialize_with = "lenient::total")]
    pub follow_up_alerts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRequest {
    pub message: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
}

/// Delivery details the notify endpoint returns next to the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(default, deserialize_with = "lenient::string")]
    pub message_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
}

/// Bare body of the liveness probe; not wrapped in the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analytics_defaults_missing_fields() {
        let analytics: Analytics = serde_json::from_value(json!({ "total_appointments": 5 })).unwrap();
        assert_eq!(analytics.total_appointments, 5);
        assert_eq!(analytics.pending_billing, 0);
        assert!(analytics.avg_wait_time.is_empty());
        assert!(analytics.todays_appointments.is_empty());
    }

    #[test]
    fn bad_cells_degrade_field_by_field() {
        let analytics: Analytics = serde_json::from_value(json!({
            "total_appointments": null,
            "pending_billing": "4",
            "active_patients": "n/a",
            "avg_wait_time": "12m",
            "follow_up_alerts": 2.0,
            "todays_appointments": [
                { "patient_name": "No Id", "appointment_time": "09:00" },
                { "id": 8, "patient_name": "Asha Rao", "appointment_time": "10:00", "status": "Pending" }
            ]
        }))
        .unwrap();

        assert_eq!(analytics.total_appointments, 0);
        assert_eq!(analytics.pending_billing, 4);
        assert_eq!(analytics.active_patients, 0);
        assert_eq!(analytics.follow_up_alerts, 2);
        assert_eq!(analytics.avg_wait_time, "12m");
        assert_eq!(analytics.todays_appointments.len(), 1);
        assert_eq!(analytics.todays_appointments[0].id, 8);
    }

    #[test]
    fn notification_omits_missing_patient() {
        let request = NotificationRequest {
            message: "Reminder".to_string(),
            phone: "1234567890".to_string(),
            patient_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "message": "Reminder", "phone": "1234567890" })
        );
    }

    #[test]
    fn health_timestamp_parses_isoformat() {
        let health: HealthStatus = serde_json::from_value(json!({
            "status": "healthy",
            "timestamp": "2024-03-15T09:30:00.123456"
        }))
        .unwrap();
        assert!(health.is_healthy());
        assert!(health.timestamp.is_some());
    }
}
