//! Deploy configuration.
//!
//! Read once at the start of a run and never mutated by the core. The file
//! format lives with the CLI; these types only define the shape and the
//! defaults.

use serde::{Deserialize, Serialize};
use wingflow_panel::PowerSignal;

/// Everything a deploy run needs to know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    pub git: GitConfig,
    pub panel: PanelConfig,
    #[serde(default)]
    pub commands: Commands,
}

/// Source repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    pub address: String,
    /// Access token injected into `https://` addresses when cloning.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default)]
    pub files: FileRules,
}

/// Include/exclude rules applied to the checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRules {
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_include() -> Vec<String> {
    vec!["*".into()]
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}

/// Target panel and server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    pub url: String,
    pub key: String,
    pub id: String,
    #[serde(default)]
    pub files: RemoteFiles,
    #[serde(default)]
    pub signal: SignalConfig,
}

/// Remote file handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteFiles {
    /// Root entries to keep during the wipe. Empty means delete everything.
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// Power signals sent around the transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    #[serde(default)]
    pub down: PowerDown,
    #[serde(default)]
    pub up: PowerUp,
    /// Milliseconds to wait after the power-down signal.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    10_000
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            down: PowerDown::default(),
            up: PowerUp::default(),
            timeout: default_timeout(),
        }
    }
}

/// How the server is brought down before the wipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerDown {
    #[default]
    Stop,
    Kill,
}

/// How the server is brought back after the upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUp {
    #[default]
    Start,
    Restart,
}

impl From<PowerDown> for PowerSignal {
    fn from(down: PowerDown) -> Self {
        match down {
            PowerDown::Stop => PowerSignal::Stop,
            PowerDown::Kill => PowerSignal::Kill,
        }
    }
}

impl From<PowerUp> for PowerSignal {
    fn from(up: PowerUp) -> Self {
        match up {
            PowerUp::Start => PowerSignal::Start,
            PowerUp::Restart => PowerSignal::Restart,
        }
    }
}

/// Shell commands run before and after the deploy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Commands {
    #[serde(default)]
    pub pre_run: Vec<String>,
    #[serde(default)]
    pub post_run: Vec<String>,
}
