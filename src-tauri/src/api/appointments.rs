use crate::models::{ApiResponse, Appointment, AppointmentPatch};

use super::ResourceClient;

impl ResourceClient<Appointment> {
    /// `PUT /appointments/{id}` with `{"status":"Confirmed"}`. Repeating it is harmless.
    pub async fn confirm(&self, id: i64) -> ApiResponse<Appointment> {
        self.update(id, &AppointmentPatch::confirm()).await
    }

    /// Moves the appointment and marks it `Rescheduled`; other stored fields are left to the server.
    pub async fn reschedule(&self, id: i64, date: &str, time: &str) -> ApiResponse<Appointment> {
        self.update(id, &AppointmentPatch::reschedule(date, time)).await
    }
}
