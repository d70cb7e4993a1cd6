//! Version-control collaborator.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use tracing::debug;

use crate::error::DeployError;

/// A boxed future returned by [`VersionControl`] methods.
pub type VcsFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DeployError>> + Send + 'a>>;

/// Fetches the repository that is being deployed.
pub trait VersionControl: Send + Sync {
    /// Fails with [`DeployError::GitMissing`] if the tool is unavailable.
    fn check_installed(&self) -> VcsFuture<'_>;

    /// Clones `address` into the existing, empty directory `dest`.
    ///
    /// `token`, when non-empty, authenticates `https://` addresses.
    fn clone_shallow<'a>(
        &'a self,
        address: &'a str,
        token: &'a str,
        dest: &'a Path,
    ) -> VcsFuture<'a>;
}

/// Drives the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".into(),
        }
    }
}

impl GitCli {
    /// Uses a specific `git` executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl VersionControl for GitCli {
    fn check_installed(&self) -> VcsFuture<'_> {
        Box::pin(async move {
            let status = tokio::process::Command::new(&self.program)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;

            match status {
                Ok(s) if s.success() => Ok(()),
                _ => Err(DeployError::GitMissing),
            }
        })
    }

    fn clone_shallow<'a>(
        &'a self,
        address: &'a str,
        token: &'a str,
        dest: &'a Path,
    ) -> VcsFuture<'a> {
        Box::pin(async move {
            debug!(address, dest = %dest.display(), "cloning repository");

            let output = tokio::process::Command::new(&self.program)
                .arg("clone")
                .arg("--depth=1")
                .arg("--quiet")
                .arg(authenticated_address(address, token))
                .arg(dest)
                .env("GIT_TERMINAL_PROMPT", "0")
                .stdin(Stdio::null())
                .output()
                .await?;

            if output.status.success() {
                return Ok(());
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(DeployError::Clone {
                address: address.to_string(),
                detail: redact(stderr.trim(), token),
            })
        })
    }
}

/// Injects `token` as the user info of an `https://` address.
///
/// Addresses that already carry credentials, or use another scheme, are
/// returned unchanged.
pub fn authenticated_address(address: &str, token: &str) -> String {
    if token.is_empty() {
        return address.to_string();
    }

    match address.strip_prefix("https://") {
        Some(rest) if !rest.split('/').next().unwrap_or_default().contains('@') => {
            format!("https://{token}@{rest}")
        }
        _ => address.to_string(),
    }
}

fn redact(text: &str, token: &str) -> String {
    if token.is_empty() {
        text.to_string()
    } else {
        text.replace(token, "***")
    }
}
