//! End-to-end deploy driver.

use std::path::Path;

use tracing::{info, warn};
use wingflow_panel::RemoteGateway;
use wingflow_resolve::{Resolution, resolve};

use crate::config::DeployConfig;
use crate::controller::SyncController;
use crate::error::{DeployError, SyncFailure, Warning};
use crate::hooks::{CommandRunner, HookPhase, run_hooks};
use crate::stage::Stage;
use crate::types::{EventSender, SyncEvent, SyncReport};
use crate::vcs::VersionControl;

/// Prefix of the temporary clone directory.
const CLONE_DIR_PREFIX: &str = "wflow-";

/// A single deploy: hooks, clone, resolve, sync, hooks.
///
/// The clone directory is removed when [`run`](Self::run) returns, on every
/// path.
pub struct Deployment<'a> {
    config: &'a DeployConfig,
    gateway: &'a dyn RemoteGateway,
    vcs: &'a dyn VersionControl,
    runner: &'a dyn CommandRunner,
    events: EventSender,
}

impl<'a> Deployment<'a> {
    pub fn new(
        config: &'a DeployConfig,
        gateway: &'a dyn RemoteGateway,
        vcs: &'a dyn VersionControl,
        runner: &'a dyn CommandRunner,
        events: EventSender,
    ) -> Self {
        Self {
            config,
            gateway,
            vcs,
            runner,
            events,
        }
    }

    pub async fn run(&self) -> Result<SyncReport, SyncFailure> {
        let mut warnings = run_hooks(
            self.runner,
            &self.config.commands.pre_run,
            HookPhase::PreRun,
            &self.events,
        )
        .await;

        match self.clone_and_deploy(&mut warnings).await {
            Ok(mut report) => {
                warnings.append(&mut report.warnings);
                report.warnings = warnings;
                Ok(report)
            }
            Err(mut failure) => {
                warnings.append(&mut failure.warnings);
                failure.warnings = warnings;
                Err(failure)
            }
        }
    }

    async fn clone_and_deploy(
        &self,
        warnings: &mut Vec<Warning>,
    ) -> Result<SyncReport, SyncFailure> {
        self.vcs.check_installed().await.map_err(before_sync)?;

        let clone_dir = tempfile::Builder::new()
            .prefix(CLONE_DIR_PREFIX)
            .tempdir()
            .map_err(|e| before_sync(e.into()))?;

        let result = self.deploy_from(clone_dir.path(), warnings).await;

        if let Err(e) = clone_dir.close() {
            warn!(error = %e, "failed to remove clone directory");
        }

        result
    }

    async fn deploy_from(
        &self,
        clone_dir: &Path,
        warnings: &mut Vec<Warning>,
    ) -> Result<SyncReport, SyncFailure> {
        let git = &self.config.git;

        info!(address = %git.address, "cloning repository");
        self.vcs
            .clone_shallow(&git.address, &git.token, clone_dir)
            .await
            .map_err(before_sync)?;

        let resolution = self.resolve(clone_dir).await.map_err(before_sync)?;
        for diagnostic in resolution.diagnostics {
            let warning = Warning::Walk {
                path: diagnostic.path,
                error: diagnostic.error.to_string(),
            };
            self.events.emit(SyncEvent::Warning(warning.clone()));
            warnings.push(warning);
        }
        self.events.emit(SyncEvent::Resolved {
            files: resolution.set.len(),
        });

        let mut controller = SyncController::new(self.gateway, self.config, self.events.clone());
        let mut report = controller.run(&resolution.set).await?;

        let mut post = run_hooks(
            self.runner,
            &self.config.commands.post_run,
            HookPhase::PostRun,
            &self.events,
        )
        .await;
        report.warnings.append(&mut post);

        Ok(report)
    }

    async fn resolve(&self, clone_dir: &Path) -> Result<Resolution, DeployError> {
        let root = clone_dir.to_path_buf();
        let rules = self.config.git.files.clone();

        let resolution = tokio::task::spawn_blocking(move || {
            resolve(&root, &rules.include, &rules.exclude)
        })
        .await
        .map_err(std::io::Error::other)??;

        Ok(resolution)
    }
}

fn before_sync(error: DeployError) -> SyncFailure {
    SyncFailure {
        stage: Stage::Idle,
        error,
        backup_archive: None,
        warnings: Vec::new(),
    }
}
