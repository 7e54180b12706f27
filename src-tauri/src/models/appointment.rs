use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::lenient;

/// Server-authoritative appointment status. Only the exact canonical spellings map to
/// a known variant; anything else, including other casings, round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Rescheduled,
    Cancelled,
    Completed,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Rescheduled => "Rescheduled",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for AppointmentStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "Pending" => AppointmentStatus::Pending,
            "Confirmed" => AppointmentStatus::Confirmed,
            "Rescheduled" => AppointmentStatus::Rescheduled,
            "Cancelled" => AppointmentStatus::Cancelled,
            "Completed" => AppointmentStatus::Completed,
            _ => AppointmentStatus::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::opt_string(deserializer)?;
        Ok(raw.as_deref().map(AppointmentStatus::from).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::opt_integer")]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub appointment_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub appointment_time: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, deserialize_with = "lenient::string")]
    pub reason: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewAppointment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    pub patient_name: String,
    pub appointment_date: String,
    pub appointment_time: String,
    /// The server fills in `Pending` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update; the server merges present keys into the stored row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentPatch {
    pub fn confirm() -> Self {
        AppointmentPatch {
            status: Some(AppointmentStatus::Confirmed),
            ..Default::default()
        }
    }

    pub fn reschedule(date: impl Into<String>, time: impl Into<String>) -> Self {
        AppointmentPatch {
            appointment_date: Some(date.into()),
            appointment_time: Some(time.into()),
            status: Some(AppointmentStatus::Rescheduled),
            ..Default::default()
        }
    }
}

/// Reschedule dialog contents. Lives only while the dialog is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleDraft {
    pub id: i64,
    pub date: String,
    pub time: String,
}

impl RescheduleDraft {
    pub fn for_appointment(appointment: &Appointment) -> Self {
        RescheduleDraft {
            id: appointment.id,
            date: appointment.appointment_date.clone(),
            time: appointment.appointment_time.clone(),
        }
    }
}
