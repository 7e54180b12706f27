use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, BackendError};
use crate::models::Settings;
use crate::services::backend::{self, BackendProcess, BackendStatus};
use crate::services::dashboard::DashboardController;

/// Shared application state managed by the desktop shell.
pub struct AppState {
    pub settings: Settings,
    pub api: ApiClient,
    pub dashboard: DashboardController,
    backend: Mutex<BackendProcess>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, ApiError> {
        let api = ApiClient::new(&settings)?;
        let dashboard = DashboardController::new(api.clone(), settings.mutation_errors);
        let backend = Mutex::new(BackendProcess::new(settings.backend.clone()));
        Ok(AppState {
            settings,
            api,
            dashboard,
            backend,
        })
    }

    /// Starts the backend and waits, bounded, until it answers health checks.
    pub async fn boot_backend(&self) -> Result<(), BackendError> {
        self.backend.lock().await.start()?;
        backend::wait_ready(&self.backend, &self.api).await
    }

    pub async fn backend_status(&self) -> BackendStatus {
        self.backend.lock().await.status().clone()
    }

    pub async fn shutdown(&self) {
        let mut backend = self.backend.lock().await;
        match backend.stop().await {
            Ok(()) => info!("Shutdown complete"),
            Err(err) => warn!(error = %err, "Failed to stop backend cleanly"),
        }
    }
}
