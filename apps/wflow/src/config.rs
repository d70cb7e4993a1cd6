//! `.wflow` configuration file.
//!
//! Stored as YAML in the project directory. The file holds the panel key and
//! possibly a git token, so it is written owner-only on Unix.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail};
use wingflow_deploy::DeployConfig;

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = ".wflow";

/// Returns the config file path inside `dir`.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Loads and parses the config file in `dir`.
pub fn load(dir: &Path) -> anyhow::Result<DeployConfig> {
    let path = config_path(dir);
    let content = std::fs::read_to_string(&path).map_err(|e| {
        anyhow!(
            "could not read {}: {e} (run `wflow init` to create one)",
            path.display()
        )
    })?;

    let config: DeployConfig = serde_yaml::from_str(&content)
        .map_err(|e| anyhow!("invalid config file {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Writes the default config into `dir`. Refuses to overwrite unless `force`.
pub fn create(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    let path = config_path(dir);
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    std::fs::create_dir_all(dir)?;
    let content = serde_yaml::to_string(&DeployConfig::default())?;
    std::fs::write(&path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    tracing::debug!(path = %path.display(), "configuration saved");
    Ok(path)
}
