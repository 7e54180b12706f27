use clinic_desk::models::HealthStatus;
use clinic_desk::services::backend::BackendStatus;
use clinic_desk::services::state::AppState;
use tauri::State;

#[tauri::command]
pub async fn backend_health(state: State<'_, AppState>) -> Result<HealthStatus, String> {
    state
        .api
        .health_check()
        .await
        .into_result()?
        .ok_or_else(|| "Empty health response".to_string())
}

#[tauri::command]
pub async fn backend_status(state: State<'_, AppState>) -> Result<BackendStatus, String> {
    Ok(state.backend_status().await)
}

#[tauri::command]
pub async fn open_external(url: String) -> Result<(), String> {
    open::that(url).map_err(|e| e.to_string())?;
    Ok(())
}
