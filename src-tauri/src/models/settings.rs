use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// What the dashboard does with a failed confirm/reschedule/notify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationErrorPolicy {
    /// Log and leave the displayed state untouched.
    #[default]
    Log,
    /// Log and keep the message as a dismissible notice in the dashboard state.
    Surface,
}

impl MutationErrorPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "log" => Some(MutationErrorPolicy::Log),
            "surface" => Some(MutationErrorPolicy::Surface),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub program: String,
    pub script: Option<PathBuf>,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            program: "python".to_string(),
            script: Some(PathBuf::from("backend/api_server.py")),
            args: Vec::new(),
            working_dir: Some(PathBuf::from("backend")),
            ready_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub mutation_errors: MutationErrorPolicy,
    pub ui_dev_url: Option<String>,
    pub backend: BackendConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            mutation_errors: MutationErrorPolicy::default(),
            ui_dev_url: None,
            backend: BackendConfig::default(),
        }
    }
}
