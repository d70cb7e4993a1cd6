//! Synchronization controller.
//!
//! Straight-line driver for one deploy against the remote server:
//!
//! | Stage | Step | On failure |
//! |---|---|---|
//! | Idle → Connected | connectivity probe | fatal |
//! | Connected → PoweredDown | power-down signal, settle wait | warning |
//! | PoweredDown → BackedUp | list root, compress snapshot | fatal |
//! | BackedUp → Wiped | delete everything not ignored | fatal |
//! | Wiped → Uploading → Completed | upload each file | per file, counted |
//! | Completed | power-up signal | warning |

use std::time::Duration;

use tracing::{error, info, warn};
use wingflow_panel::{PowerSignal, RemoteGateway};
use wingflow_resolve::{RemotePathMapper, ResolutionSet};

use crate::config::DeployConfig;
use crate::deletion::IgnoreRules;
use crate::error::{DeployError, SyncFailure, Warning};
use crate::stage::{Stage, StageMachine};
use crate::types::{EventSender, SyncEvent, SyncReport};
use crate::upload::upload_files;

/// Owns the [`Stage`] of a deploy and drives the remote gateway.
pub struct SyncController<'a> {
    gateway: &'a dyn RemoteGateway,
    config: &'a DeployConfig,
    events: EventSender,
    stage: StageMachine,
}

impl<'a> SyncController<'a> {
    pub fn new(gateway: &'a dyn RemoteGateway, config: &'a DeployConfig, events: EventSender) -> Self {
        Self {
            gateway,
            config,
            events,
            stage: StageMachine::new(),
        }
    }

    /// The currently active stage.
    pub fn stage(&self) -> Stage {
        self.stage.current()
    }

    /// Synchronizes the server with `files`.
    ///
    /// Returns a report once `Completed` is reached, even if some uploads
    /// failed. Any fatal error moves the controller to `Failed`.
    pub async fn run(&mut self, files: &ResolutionSet) -> Result<SyncReport, SyncFailure> {
        let mut report = SyncReport::default();

        match self.drive(files, &mut report).await {
            Ok(()) => Ok(report),
            Err(error) => {
                let stage = self.stage.fail();
                self.events.emit(SyncEvent::Stage(Stage::Failed));
                error!(%stage, error = %error, "deploy aborted");
                if let Some(archive) = &report.backup_archive {
                    error!(archive = %archive, "server files were backed up to this archive");
                }

                Err(SyncFailure {
                    stage,
                    error,
                    backup_archive: report.backup_archive,
                    warnings: report.warnings,
                })
            }
        }
    }

    async fn drive(
        &mut self,
        files: &ResolutionSet,
        report: &mut SyncReport,
    ) -> Result<(), DeployError> {
        let config = self.config;
        let ignore = IgnoreRules::compile(&config.panel.files.ignore)?;
        let signal = &config.panel.signal;

        info!("testing panel connection");
        let status = self
            .gateway
            .test_connection()
            .await
            .map_err(DeployError::Connectivity)?;
        info!(status, "panel connection ok");
        self.enter(Stage::Connected)?;

        let down = PowerSignal::from(signal.down);
        info!(signal = %down, "preparing server for upload");
        if self.power(down, report).await && signal.timeout > 0 {
            info!(timeout_ms = signal.timeout, "waiting for server to settle");
            tokio::time::sleep(Duration::from_millis(signal.timeout)).await;
        }
        self.enter(Stage::PoweredDown)?;

        let listing = self
            .gateway
            .list_root_files()
            .await
            .map_err(DeployError::Backup)?;
        if listing.is_empty() {
            info!("server has no files; skipping backup");
        } else {
            info!(entries = listing.len(), "backing up server files");
            let archive = self
                .gateway
                .compress_files(&listing)
                .await
                .map_err(DeployError::Backup)?;
            info!(archive = %archive, "backup archive created");
            self.events.emit(SyncEvent::BackupCreated {
                archive: archive.clone(),
            });
            report.backup_archive = Some(archive);
        }
        self.enter(Stage::BackedUp)?;

        let deletion = ignore.deletion_set(&listing, report.backup_archive.as_deref());
        if deletion.is_empty() {
            info!("nothing to delete on the server");
        } else {
            info!(entries = deletion.len(), "truncating server files");
            self.gateway
                .delete_files(&deletion)
                .await
                .map_err(DeployError::Wipe)?;
        }
        self.events.emit(SyncEvent::Wiped {
            deleted: deletion.len(),
        });
        report.deleted = deletion;
        self.enter(Stage::Wiped)?;

        self.enter(Stage::Uploading)?;
        let mapper = RemotePathMapper::new(files.root());
        report.upload = upload_files(self.gateway, files, &mapper, &self.events).await;
        self.enter(Stage::Completed)?;

        self.power(PowerSignal::from(signal.up), report).await;
        Ok(())
    }

    fn enter(&mut self, stage: Stage) -> Result<(), DeployError> {
        self.stage.advance(stage)?;
        self.events.emit(SyncEvent::Stage(stage));
        Ok(())
    }

    /// Sends a power signal; failure becomes a warning. Returns `true` on success.
    async fn power(&self, signal: PowerSignal, report: &mut SyncReport) -> bool {
        match self.gateway.set_power(signal).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%signal, error = %e, "failed to set power state; continuing");
                let warning = Warning::PowerSignal {
                    signal,
                    error: e.to_string(),
                };
                self.events.emit(SyncEvent::Warning(warning.clone()));
                report.warnings.push(warning);
                false
            }
        }
    }
}
