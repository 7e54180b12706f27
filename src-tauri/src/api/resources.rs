use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ApiClient;
use crate::models::{
    ApiResponse, Appointment, AppointmentPatch, BillingPatch, BillingRecord, NewAppointment, NewBillingRecord,
    NewPatient, NewPrescription, NewReport, Patient, PatientPatch, Prescription, PrescriptionPatch, Report,
    ReportPatch,
};

/// A backend entity with the standard list/create/update/delete endpoints under `PATH`.
pub trait Resource: DeserializeOwned {
    const PATH: &'static str;
    type Draft: Serialize;
    type Patch: Serialize;
}

impl Resource for Patient {
    const PATH: &'static str = "/patients";
    type Draft = NewPatient;
    type Patch = PatientPatch;
}

impl Resource for Appointment {
    const PATH: &'static str = "/appointments";
    type Draft = NewAppointment;
    type Patch = AppointmentPatch;
}

impl Resource for BillingRecord {
    const PATH: &'static str = "/billing";
    type Draft = NewBillingRecord;
    type Patch = BillingPatch;
}

impl Resource for Report {
    const PATH: &'static str = "/reports";
    type Draft = NewReport;
    type Patch = ReportPatch;
}

impl Resource for Prescription {
    const PATH: &'static str = "/prescriptions";
    type Draft = NewPrescription;
    type Patch = PrescriptionPatch;
}

/// Typed CRUD calls for one entity. No input validation happens here.
#[derive(Debug, Clone)]
pub struct ResourceClient<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        ResourceClient {
            api,
            _resource: PhantomData,
        }
    }

    pub fn item_path(id: i64) -> String {
        format!("{}/{}", R::PATH, id)
    }

    pub async fn list(&self) -> ApiResponse<Vec<R>> {
        self.api.get(R::PATH).await
    }

    pub async fn create(&self, draft: &R::Draft) -> ApiResponse<R> {
        self.api.send_json(R::PATH, Method::POST, draft).await
    }

    pub async fn update(&self, id: i64, patch: &R::Patch) -> ApiResponse<R> {
        self.api.send_json(&Self::item_path(id), Method::PUT, patch).await
    }

    pub async fn delete(&self, id: i64) -> ApiResponse<()> {
        self.api.delete(&Self::item_path(id)).await
    }
}
