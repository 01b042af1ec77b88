//! Error taxonomy for core supervision.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the supervisor, synchronously from `start()` for the
/// pre-spawn subset and as [`super::CoreEvent::Error`] notifications for
/// everything that happens after control has returned.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A start was requested while a run is already in progress.
    #[error("core is already running")]
    AlreadyRunning,

    /// The core executable could not be resolved on disk.
    #[error("core executable not found: {path}")]
    ExecutableNotFound { path: PathBuf },

    /// The submitted profile cannot produce a working config.
    #[error("invalid connection profile: {reason}")]
    InvalidProfile { reason: String },

    /// The config builder failed, or the artifact could not be written.
    #[error("failed to materialize core config: {0}")]
    ConfigMaterializationFailed(String),

    /// The core never announced its control endpoint in time.
    #[error("core did not confirm startup within {0:?}")]
    StartupTimeout(Duration),

    /// The core terminated abnormally without a stop being requested.
    #[error("core process crashed")]
    ProcessCrashed,

    /// Generic OS-level process failure.
    #[error("core process error: {0}")]
    ProcessError(String),

    /// The supervisor actor is no longer running.
    #[error("core supervisor has shut down")]
    SupervisorGone,
}

impl SupervisorError {
    /// Stable category tag carried by error notifications.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "alreadyRunning",
            Self::ExecutableNotFound { .. } => "executableNotFound",
            Self::InvalidProfile { .. } => "invalidProfile",
            Self::ConfigMaterializationFailed(_) => "configMaterializationFailed",
            Self::StartupTimeout(_) => "startupTimeout",
            Self::ProcessCrashed => "processCrashed",
            Self::ProcessError(_) => "processError",
            Self::SupervisorGone => "supervisorGone",
        }
    }
}
