use clinic_desk::services::state::AppState;
use clinic_desk::services::view::DashboardView;
use serde::Deserialize;
use tauri::State;

use super::{current_view, ActionResponse};

#[derive(Deserialize)]
pub struct ReschedulePayload {
    pub date: Option<String>,
    pub time: Option<String>,
}

#[tauri::command]
pub async fn confirm_appointment(id: i64, state: State<'_, AppState>) -> Result<ActionResponse, String> {
    let outcome = state.dashboard.confirm_appointment(id).await;
    Ok(ActionResponse {
        outcome,
        view: current_view(&state).await,
    })
}

#[tauri::command]
pub async fn open_reschedule(id: i64, state: State<'_, AppState>) -> Result<DashboardView, String> {
    state.dashboard.open_reschedule(id).await;
    Ok(current_view(&state).await)
}

#[tauri::command]
pub async fn update_reschedule(
    payload: ReschedulePayload,
    state: State<'_, AppState>,
) -> Result<DashboardView, String> {
    state
        .dashboard
        .update_reschedule(payload.date, payload.time)
        .await;
    Ok(current_view(&state).await)
}

#[tauri::command]
pub async fn cancel_reschedule(state: State<'_, AppState>) -> Result<DashboardView, String> {
    state.dashboard.cancel_reschedule().await;
    Ok(current_view(&state).await)
}

#[tauri::command]
pub async fn submit_reschedule(state: State<'_, AppState>) -> Result<ActionResponse, String> {
    let outcome = state.dashboard.submit_reschedule().await;
    Ok(ActionResponse {
        outcome,
        view: current_view(&state).await,
    })
}

#[tauri::command]
pub async fn send_reminder(id: i64, phone: String, state: State<'_, AppState>) -> Result<ActionResponse, String> {
    if phone.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }
    let outcome = state.dashboard.send_reminder(id, phone.trim()).await;
    Ok(ActionResponse {
        outcome,
        view: current_view(&state).await,
    })
}
