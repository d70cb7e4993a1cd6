//! Per-file upload pipeline.
//!
//! Files are sent one at a time in resolution order. A failed file is
//! recorded and the loop moves on; delivery of the whole set is best-effort.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use wingflow_panel::RemoteGateway;
use wingflow_resolve::{RemotePathMapper, ResolutionSet};

use crate::types::{EventSender, SyncEvent};

/// Aggregate result of an upload pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub succeeded: usize,
    /// Local paths that were not written, in the order they were tried.
    pub failed: Vec<PathBuf>,
}

impl UploadReport {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

/// Uploads every file in `files` through `gateway`.
pub async fn upload_files(
    gateway: &dyn RemoteGateway,
    files: &ResolutionSet,
    mapper: &RemotePathMapper,
    events: &EventSender,
) -> UploadReport {
    let total = files.len();
    let mut report = UploadReport::default();

    for (i, path) in files.iter().enumerate() {
        let remote_path = match mapper.map(path) {
            Ok(p) => p,
            Err(e) => {
                record_failure(&mut report, events, path, e.to_string());
                continue;
            }
        };

        events.emit(SyncEvent::Uploading {
            index: i + 1,
            total,
            remote_path: remote_path.clone(),
        });

        let contents = match tokio::fs::read(path).await {
            Ok(c) => c,
            Err(e) => {
                record_failure(&mut report, events, path, format!("read failed: {e}"));
                continue;
            }
        };

        let size = contents.len();
        match gateway.write_file(&remote_path, contents).await {
            Ok(()) => {
                debug!(file = %remote_path, bytes = size, "uploaded");
                report.succeeded += 1;
            }
            Err(e) => record_failure(&mut report, events, path, e.to_string()),
        }
    }

    if report.failed.is_empty() {
        info!(files = report.succeeded, "upload completed");
    } else {
        warn!(
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "{} file(s) failed to upload",
            report.failed.len()
        );
    }

    report
}

fn record_failure(report: &mut UploadReport, events: &EventSender, path: &Path, error: String) {
    warn!(file = %path.display(), error = %error, "failed to upload file");
    events.emit(SyncEvent::UploadFailed {
        path: path.to_path_buf(),
        error,
    });
    report.failed.push(path.to_path_buf());
}
