use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Everything that can go wrong between issuing a request and holding a typed envelope.
/// Never leaves the transport: it is folded into `ApiResponse::failure` at the boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failing status and the server explained itself in the `error` field.
    #[error("{0}")]
    Server(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    pub fn into_message(self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend script not found: {}", .0.display())]
    ScriptMissing(PathBuf),
    #[error("failed to start backend `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("backend did not become ready within {0:?}")]
    ReadyTimeout(Duration),
    #[error("backend exited before becoming ready ({0})")]
    Exited(String),
    #[error("backend is not running")]
    NotRunning,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
