//! Renders deploy events as log lines.
//!
//! Failures and warnings are already logged by the engine when they happen,
//! so they are only echoed at debug level here.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};
use wingflow_deploy::{Stage, SyncEvent};

/// Logs events until every sender is dropped.
pub async fn drain(mut rx: UnboundedReceiver<SyncEvent>) {
    while let Some(event) = rx.recv().await {
        render(&event);
    }
}

fn render(event: &SyncEvent) {
    match event {
        SyncEvent::Stage(Stage::Failed) => warn!("stage: failed"),
        SyncEvent::Stage(stage) => info!("stage: {stage}"),
        SyncEvent::Resolved { files } => info!("resolved {files} file(s) to deploy"),
        SyncEvent::BackupCreated { archive } => debug!("backup created: {archive}"),
        SyncEvent::Wiped { deleted } => info!("removed {deleted} entries from the server root"),
        SyncEvent::Uploading {
            index,
            total,
            remote_path,
        } => info!("[{index}/{total}] {remote_path}"),
        SyncEvent::UploadFailed { path, error } => {
            debug!("upload failed: {}: {error}", path.display())
        }
        SyncEvent::Warning(w) => debug!("warning: {w}"),
    }
}
