#![cfg(unix)]

mod support;

use std::path::PathBuf;
use std::time::Duration;

use clinic_desk::error::BackendError;
use clinic_desk::models::BackendConfig;
use clinic_desk::services::backend::{wait_ready, BackendProcess, BackendStatus};
use serde_json::json;
use tokio::sync::Mutex;

use support::FakeBackend;

fn config(program: &str, args: &[&str]) -> BackendConfig {
    BackendConfig {
        program: program.to_string(),
        script: None,
        args: args.iter().map(|a| a.to_string()).collect(),
        working_dir: None,
        ready_timeout: Duration::from_millis(600),
        poll_interval: Duration::from_millis(20),
    }
}

#[tokio::test]
async fn becomes_ready_once_health_answers() {
    let backend = FakeBackend::start().await;
    backend.reply("GET", "/health", 200, json!({ "status": "healthy", "timestamp": null }));
    let process = Mutex::new(BackendProcess::new(config("sleep", &["30"])));

    process.lock().await.start().unwrap();
    assert_eq!(process.lock().await.status(), &BackendStatus::Starting);
    wait_ready(&process, &backend.client()).await.unwrap();
    assert_eq!(process.lock().await.status(), &BackendStatus::Ready);

    let mut process = process.into_inner();
    process.stop().await.unwrap();
    assert_eq!(process.status(), &BackendStatus::Stopped);
}

#[tokio::test]
async fn times_out_when_health_never_answers() {
    let backend = FakeBackend::start().await;
    let process = Mutex::new(BackendProcess::new(config("sleep", &["30"])));

    process.lock().await.start().unwrap();
    let err = wait_ready(&process, &backend.client()).await.unwrap_err();

    assert!(matches!(err, BackendError::ReadyTimeout(_)));
    assert!(backend.hits("GET", "/health") > 1);
    process.lock().await.stop().await.unwrap();
}

#[tokio::test]
async fn reports_a_child_that_exits_early() {
    let backend = FakeBackend::start().await;
    let process = Mutex::new(BackendProcess::new(config("true", &[])));

    process.lock().await.start().unwrap();
    let err = wait_ready(&process, &backend.client()).await.unwrap_err();

    assert!(matches!(err, BackendError::Exited(_)));
    assert_eq!(process.lock().await.status(), &BackendStatus::Exited { code: Some(0) });
}

#[tokio::test]
async fn missing_script_is_rejected_before_spawning() {
    let mut settings = config("sleep", &[]);
    settings.script = Some(PathBuf::from("does/not/exist/api_server.py"));
    let mut process = BackendProcess::new(settings);

    let err = process.start().unwrap_err();

    assert!(matches!(err, BackendError::ScriptMissing(_)));
    assert_eq!(process.status(), &BackendStatus::Stopped);
}

#[tokio::test]
async fn unknown_program_fails_to_spawn() {
    let mut process = BackendProcess::new(config("clinic-desk-no-such-program", &[]));

    let err = process.start().unwrap_err();

    assert!(matches!(err, BackendError::Spawn { .. }));
}

#[tokio::test]
async fn stop_is_idempotent() {
    let mut process = BackendProcess::new(config("sleep", &["30"]));

    process.stop().await.unwrap();
    process.start().unwrap();
    process.stop().await.unwrap();
    process.stop().await.unwrap();

    assert_eq!(process.status(), &BackendStatus::Stopped);
}

#[tokio::test]
async fn waiting_without_a_child_is_an_error() {
    let backend = FakeBackend::start().await;
    let process = Mutex::new(BackendProcess::new(config("sleep", &["30"])));

    let err = wait_ready(&process, &backend.client()).await.unwrap_err();

    assert!(matches!(err, BackendError::NotRunning));
}
