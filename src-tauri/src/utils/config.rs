use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::models::{MutationErrorPolicy, Settings};

const ENV_API_BASE_URL: &str = "CLINIC_API_BASE_URL";
const ENV_REQUEST_TIMEOUT: &str = "CLINIC_REQUEST_TIMEOUT_SECS";
const ENV_BACKEND_PROGRAM: &str = "CLINIC_BACKEND_PROGRAM";
const ENV_BACKEND_SCRIPT: &str = "CLINIC_BACKEND_SCRIPT";
const ENV_BACKEND_DIR: &str = "CLINIC_BACKEND_DIR";
const ENV_READY_TIMEOUT: &str = "CLINIC_READY_TIMEOUT_SECS";
const ENV_MUTATION_ERRORS: &str = "CLINIC_MUTATION_ERRORS";
const ENV_UI_DEV_URL: &str = "CLINIC_UI_DEV_URL";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Defaults overridden by the process environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = read(ENV_API_BASE_URL) {
        settings.api_base_url = url;
    }
    if let Some(raw) = read(ENV_REQUEST_TIMEOUT) {
        match parse_secs(&raw) {
            Some(timeout) => settings.request_timeout = timeout,
            None => warn!(key = ENV_REQUEST_TIMEOUT, value = %raw, "ignoring invalid timeout"),
        }
    }
    if let Some(program) = read(ENV_BACKEND_PROGRAM) {
        settings.backend.program = program;
    }
    if let Some(script) = read(ENV_BACKEND_SCRIPT) {
        settings.backend.script = Some(PathBuf::from(script));
    }
    if let Some(dir) = read(ENV_BACKEND_DIR) {
        settings.backend.working_dir = Some(PathBuf::from(dir));
    }
    if let Some(raw) = read(ENV_READY_TIMEOUT) {
        match parse_secs(&raw) {
            Some(timeout) => settings.backend.ready_timeout = timeout,
            None => warn!(key = ENV_READY_TIMEOUT, value = %raw, "ignoring invalid timeout"),
        }
    }
    if let Some(raw) = read(ENV_MUTATION_ERRORS) {
        match MutationErrorPolicy::parse(&raw) {
            Some(policy) => settings.mutation_errors = policy,
            None => warn!(key = ENV_MUTATION_ERRORS, value = %raw, "expected `log` or `surface`"),
        }
    }
    if let Some(url) = read(ENV_UI_DEV_URL) {
        settings.ui_dev_url = Some(url);
    }
}

fn parse_secs(raw: &str) -> Option<Duration> {
    raw.parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
