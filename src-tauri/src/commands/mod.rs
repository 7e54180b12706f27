pub mod appointments;
pub mod dashboard;
pub mod system;

use serde::Serialize;

use clinic_desk::services::dashboard::MutationOutcome;
use clinic_desk::services::state::AppState;
use clinic_desk::services::view::DashboardView;

#[derive(Serialize)]
pub struct ActionResponse {
    pub outcome: MutationOutcome,
    pub view: DashboardView,
}

pub async fn current_view(state: &AppState) -> DashboardView {
    DashboardView::render(&state.dashboard.snapshot().await)
}
