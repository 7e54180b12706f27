use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::error::BackendError;
use crate::models::BackendConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BackendStatus {
    Stopped,
    Starting,
    Ready,
    Exited { code: Option<i32> },
}

/// Supervised handle on the API server child process.
///
/// `Stopped -> Starting` on [`start`](Self::start), `Starting -> Ready` once [`wait_ready`]
/// sees `/health` answer, back to `Stopped` on [`stop`](Self::stop). The child is killed
/// when the handle is dropped.
pub struct BackendProcess {
    config: BackendConfig,
    child: Option<Child>,
    status: BackendStatus,
}

impl BackendProcess {
    pub fn new(config: BackendConfig) -> Self {
        BackendProcess {
            config,
            child: None,
            status: BackendStatus::Stopped,
        }
    }

    pub fn status(&self) -> &BackendStatus {
        &self.status
    }

    /// Spawns the child. Must run inside a Tokio runtime; a no-op while a child is alive.
    pub fn start(&mut self) -> Result<(), BackendError> {
        if self.child.is_some() {
            return Ok(());
        }

        info!(program = %self.config.program, "Starting backend server");
        let mut command = Command::new(&self.config.program);
        if let Some(script) = &self.config.script {
            let script = resolve(script)?;
            if !script.exists() {
                error!(script = %script.display(), "Backend script not found");
                return Err(BackendError::ScriptMissing(script));
            }
            command.arg(script);
        }
        command.args(&self.config.args);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| BackendError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_output(stdout, false));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_output(stderr, true));
        }

        self.child = Some(child);
        self.status = BackendStatus::Starting;
        Ok(())
    }

    /// Reports `Exited` if the child has terminated, `NotRunning` if there is none.
    fn check_alive(&mut self) -> Result<(), BackendError> {
        let child = self.child.as_mut().ok_or(BackendError::NotRunning)?;
        if let Some(exit) = child.try_wait()? {
            self.child = None;
            self.status = BackendStatus::Exited { code: exit.code() };
            error!(%exit, "Backend process exited");
            return Err(BackendError::Exited(exit.to_string()));
        }
        Ok(())
    }

    fn mark_ready(&mut self) -> Result<(), BackendError> {
        self.check_alive()?;
        self.status = BackendStatus::Ready;
        Ok(())
    }

    /// Kills the child if it is still running. Idempotent.
    pub async fn stop(&mut self) -> Result<(), BackendError> {
        let Some(mut child) = self.child.take() else {
            self.status = BackendStatus::Stopped;
            return Ok(());
        };
        if child.try_wait()?.is_none() {
            child.kill().await?;
        }
        self.status = BackendStatus::Stopped;
        info!("Backend server stopped");
        Ok(())
    }
}

/// Polls the health endpoint until it reports healthy, the child exits or is
/// stopped, or the configured readiness window elapses.
///
/// The handle is only locked for the liveness check of each round, never across a
/// health request or the sleep between rounds, so `stop` can run at any point.
pub async fn wait_ready(backend: &Mutex<BackendProcess>, api: &ApiClient) -> Result<(), BackendError> {
    let (window, interval) = {
        let process = backend.lock().await;
        (process.config.ready_timeout, process.config.poll_interval)
    };
    match tokio::time::timeout(window, poll_until_ready(backend, api, interval)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(?window, "Backend did not report healthy in time");
            Err(BackendError::ReadyTimeout(window))
        }
    }
}

async fn poll_until_ready(
    backend: &Mutex<BackendProcess>,
    api: &ApiClient,
    interval: Duration,
) -> Result<(), BackendError> {
    loop {
        backend.lock().await.check_alive()?;

        let health = api.health_check().await;
        if health.data.as_ref().is_some_and(|h| h.is_healthy()) {
            backend.lock().await.mark_ready()?;
            info!(url = api.base_url(), "Backend is ready");
            return Ok(());
        }

        tokio::time::sleep(interval).await;
    }
}

fn resolve(script: &Path) -> Result<PathBuf, BackendError> {
    if script.is_absolute() {
        Ok(script.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(script))
    }
}

async fn forward_output<R>(reader: R, is_stderr: bool)
where
    R: AsyncRead + Unpin,
{
    forward_lines(reader, |line| {
        if is_stderr {
            warn!(target: "clinic_desk::backend", "{}", line);
        } else {
            info!(target: "clinic_desk::backend", "{}", line);
        }
    })
    .await;
}

/// Drains `reader` to EOF, one line at a time. Bytes that are not UTF-8 are
/// replaced rather than ending the stream; the child blocks or fails on a closed pipe.
async fn forward_lines<R, F>(reader: R, mut emit: F) -> usize
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                emit(line.trim_end_matches(['\n', '\r']));
                count += 1;
            }
            Err(err) => {
                warn!(error = %err, "Stopped reading backend output");
                break;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn undecodable_output_does_not_stop_forwarding() {
        let mut seen = Vec::new();
        let output: &[u8] = b"caf\xe9 order\r\nok\nlast without newline";

        let count = forward_lines(output, |line| seen.push(line.to_string())).await;

        assert_eq!(count, 3);
        assert_eq!(seen, vec!["caf\u{fffd} order", "ok", "last without newline"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_is_not_blocked_by_a_pending_readiness_wait() {
        let backend = Mutex::new(BackendProcess::new(BackendConfig {
            program: "sleep".to_string(),
            script: None,
            args: vec!["30".to_string()],
            working_dir: None,
            ready_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(20),
        }));
        backend.lock().await.start().unwrap();
        let api = ApiClient::with_client(reqwest::Client::new(), "http://127.0.0.1:1");

        let waiting = wait_ready(&backend, &api);
        let stopping = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(backend.lock().await.status(), &BackendStatus::Starting);
            tokio::time::timeout(Duration::from_millis(500), async {
                backend.lock().await.stop().await
            })
            .await
        };
        let (waited, stopped) = tokio::join!(waiting, stopping);

        assert!(stopped.unwrap().is_ok());
        assert!(matches!(waited, Err(BackendError::NotRunning)));
        assert_eq!(backend.lock().await.status(), &BackendStatus::Stopped);
    }
}
