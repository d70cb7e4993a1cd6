//! Data types shared by the deploy flow.

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::error::Warning;
use crate::stage::Stage;
use crate::upload::UploadReport;

/// Notification emitted while a deploy runs.
///
/// Purely observational: nothing in the engine waits on or reacts to the
/// receiver.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The state machine entered a stage.
    Stage(Stage),
    /// Files resolved from the checkout.
    Resolved { files: usize },
    /// Server-side snapshot created before the wipe.
    BackupCreated { archive: String },
    /// Root entries removed from the server.
    Wiped { deleted: usize },
    /// About to upload file `index` of `total` (1-based).
    Uploading {
        index: usize,
        total: usize,
        remote_path: String,
    },
    /// A single file could not be uploaded.
    UploadFailed { path: PathBuf, error: String },
    /// Something went wrong that does not stop the deploy.
    Warning(Warning),
}

/// Non-blocking event channel handed to the engine.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Option<mpsc::UnboundedSender<SyncEvent>>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<SyncEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sender that drops every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Creates a connected sender/receiver pair.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: SyncEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Outcome of a deploy that reached `Completed`.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Server-side snapshot of the pre-wipe root, if anything was there.
    pub backup_archive: Option<String>,
    /// Root entries removed during the wipe.
    pub deleted: Vec<String>,
    pub upload: UploadReport,
    pub warnings: Vec<Warning>,
}

impl SyncReport {
    /// `true` when the wipe ran but some files never made it to the server.
    pub fn is_partial(&self) -> bool {
        !self.upload.failed.is_empty()
    }
}
