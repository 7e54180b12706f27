#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod commands;

use anyhow::anyhow;
use tauri::{AppHandle, Manager, RunEvent, Url, WebviewUrl, WebviewWindowBuilder};
use tracing::{error, info, warn};

use clinic_desk::services::state::AppState;
use clinic_desk::utils;

fn main() {
    utils::config::load_dotenv();
    utils::init_tracing();
    let settings = utils::config::load_settings();

    let app = tauri::Builder::default()
        .setup(move |app| {
            let state = AppState::new(settings.clone()).map_err(|e| anyhow!("API client: {}", e))?;
            app.manage(state);

            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                boot(handle).await;
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::dashboard::get_dashboard,
            commands::dashboard::refresh_dashboard,
            commands::dashboard::select_tab,
            commands::dashboard::dismiss_notice,
            commands::appointments::confirm_appointment,
            commands::appointments::open_reschedule,
            commands::appointments::update_reschedule,
            commands::appointments::cancel_reschedule,
            commands::appointments::submit_reschedule,
            commands::appointments::send_reminder,
            commands::system::backend_health,
            commands::system::backend_status,
            commands::system::open_external,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|handle, event| {
        if let RunEvent::Exit = event {
            let state = handle.state::<AppState>();
            tauri::async_runtime::block_on(state.shutdown());
        }
    });
}

/// Backend first, window second. A backend that never gets healthy still gets a
/// window; the dashboard then renders its defaults.
async fn boot(handle: AppHandle) {
    let state = handle.state::<AppState>();
    match state.boot_backend().await {
        Ok(()) => info!("Backend ready, opening dashboard"),
        Err(err) => warn!(error = %err, "Opening dashboard without a ready backend"),
    }

    if let Err(err) = open_main_window(&handle, state.settings.ui_dev_url.as_deref()) {
        error!(error = %err, "Failed to open main window");
    }
}

fn open_main_window(handle: &AppHandle, dev_url: Option<&str>) -> anyhow::Result<()> {
    let url = match dev_url {
        Some(raw) => WebviewUrl::External(raw.parse::<Url>()?),
        None => WebviewUrl::App("index.html".into()),
    };
    let dev_origin = dev_url.and_then(|raw| raw.parse::<Url>().ok());

    let window = WebviewWindowBuilder::new(handle, "main", url)
        .title("Clinic Desk")
        .inner_size(1400.0, 900.0)
        .on_navigation(move |target| {
            if is_app_url(target, dev_origin.as_ref()) {
                return true;
            }
            if let Err(err) = open::that(target.as_str()) {
                warn!(url = %target, error = %err, "Failed to open external link");
            }
            false
        })
        .build()?;

    #[cfg(debug_assertions)]
    if dev_url.is_some() {
        window.open_devtools();
    }
    #[cfg(not(debug_assertions))]
    drop(window);
    Ok(())
}

fn is_app_url(url: &Url, dev_origin: Option<&Url>) -> bool {
    if matches!(url.scheme(), "tauri" | "asset" | "about" | "data") {
        return true;
    }
    if url.host_str() == Some("tauri.localhost") {
        return true;
    }
    dev_origin.is_some_and(|origin| origin.origin() == url.origin())
}
