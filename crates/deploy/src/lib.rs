//! Deploy synchronization engine.
//!
//! This crate implements the **business logic** for shipping a repository
//! checkout to a panel-hosted server. It has no CLI or terminal
//! dependencies; callers provide a [`RemoteGateway`](wingflow_panel::RemoteGateway),
//! a [`VersionControl`] and a [`CommandRunner`].
//!
//! # Pipeline
//!
//! 1. **Hooks**: run pre-run commands
//! 2. **Clone**: shallow clone into a temporary directory
//! 3. **Resolve**: pick the files to ship
//! 4. **Sync**: connect, power down, back up, wipe, upload, power up
//! 5. **Hooks**: run post-run commands

pub mod config;
pub mod controller;
pub mod deletion;
pub mod error;
pub mod hooks;
pub mod run;
pub mod stage;
pub mod types;
pub mod upload;
pub mod vcs;

#[cfg(test)]
pub(crate) mod fake;

pub use config::{Commands, DeployConfig, FileRules, GitConfig, PanelConfig, PowerDown, PowerUp};
pub use controller::SyncController;
pub use deletion::IgnoreRules;
pub use error::{DeployError, SyncFailure, Warning};
pub use hooks::{CommandOutcome, CommandRunner, HookPhase, ShellRunner};
pub use run::Deployment;
pub use stage::{InvalidTransition, Stage, StageMachine};
pub use types::{EventSender, SyncEvent, SyncReport};
pub use upload::{UploadReport, upload_files};
pub use vcs::{GitCli, VersionControl};
