use clinic_desk::services::dashboard::Tab;
use clinic_desk::services::state::AppState;
use clinic_desk::services::view::DashboardView;
use tauri::State;

use super::current_view;

/// Mount: the first call performs the initial analytics load.
#[tauri::command]
pub async fn get_dashboard(state: State<'_, AppState>) -> Result<DashboardView, String> {
    state.dashboard.ensure_loaded().await;
    Ok(current_view(&state).await)
}

#[tauri::command]
pub async fn refresh_dashboard(state: State<'_, AppState>) -> Result<DashboardView, String> {
    state.dashboard.load().await;
    Ok(current_view(&state).await)
}

#[tauri::command]
pub async fn select_tab(tab: Tab, state: State<'_, AppState>) -> Result<DashboardView, String> {
    state.dashboard.select_tab(tab).await;
    Ok(current_view(&state).await)
}

#[tauri::command]
pub async fn dismiss_notice(state: State<'_, AppState>) -> Result<DashboardView, String> {
    state.dashboard.dismiss_notice().await;
    Ok(current_view(&state).await)
}
