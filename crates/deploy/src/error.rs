//! Deploy error types.

use std::path::PathBuf;

use wingflow_panel::{PanelError, PowerSignal};
use wingflow_resolve::ResolveError;

use crate::stage::{InvalidTransition, Stage};

/// Errors that abort a deploy.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("git is not installed or not on PATH")]
    GitMissing,

    #[error("failed to clone repository {address}: {detail}")]
    Clone { address: String, detail: String },

    #[error("connection to panel failed: {0}")]
    Connectivity(#[source] PanelError),

    #[error("failed to back up server files: {0}")]
    Backup(#[source] PanelError),

    #[error("failed to truncate server files: {0}")]
    Wipe(#[source] PanelError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

/// A fatal abort, with enough context for manual recovery.
#[derive(Debug, thiserror::Error)]
#[error("deploy failed after reaching stage {stage}: {error}")]
pub struct SyncFailure {
    /// Last stage reached before the failure.
    pub stage: Stage,
    #[source]
    pub error: DeployError,
    /// Server-side snapshot taken before the wipe, if one was made.
    pub backup_archive: Option<String>,
    /// Non-fatal problems collected before the abort.
    pub warnings: Vec<Warning>,
}

impl SyncFailure {
    /// `true` when the failure happened after the backup, so the remote
    /// tree may already be partly deleted.
    pub fn remote_modified(&self) -> bool {
        self.stage >= Stage::BackedUp
    }
}

/// Problems that are logged and reported but never abort a deploy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    #[error("failed to send power signal {signal}: {error}")]
    PowerSignal { signal: PowerSignal, error: String },

    #[error("command {command:?} failed: {error}")]
    ExternalCommand { command: String, error: String },

    #[error("skipped unreadable path {}: {error}", path.display())]
    Walk { path: PathBuf, error: String },
}
