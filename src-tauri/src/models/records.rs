use serde::{Deserialize, Serialize};

use crate::utils::lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub medical_history: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub allergies: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub emergency_contact: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPatient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::opt_integer")]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub service_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub bill_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewBillingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    pub patient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    pub amount: f64,
    /// The server fills in `Pending` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BillingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::opt_integer")]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub report_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub treatment: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub medications: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub follow_up_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    pub patient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::opt_integer")]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub medication_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub dosage: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub prescribed_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPrescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    pub patient_name: String,
    pub medication_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PrescriptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}
