//! Shared fakes for the deploy scenario tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use wingflow_deploy::hooks::CommandFuture;
use wingflow_deploy::vcs::VcsFuture;
use wingflow_deploy::{CommandOutcome, CommandRunner, DeployConfig, DeployError, VersionControl};
use wingflow_panel::{GatewayFuture, PanelError, PowerSignal, RemoteGateway};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    TestConnection,
    ListRootFiles,
    Compress(Vec<String>),
    Delete(Vec<String>),
    Power(PowerSignal),
    Write(String, Vec<u8>),
}

/// Panel double recording every call.
#[derive(Default)]
pub struct MockPanel {
    pub listing: Vec<String>,
    pub connection_status: Option<u16>,
    pub calls: Mutex<Vec<Call>>,
}

impl MockPanel {
    pub fn with_listing(names: &[&str]) -> Self {
        Self {
            listing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Write(path, _) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RemoteGateway for MockPanel {
    fn test_connection(&self) -> GatewayFuture<'_, u16> {
        self.record(Call::TestConnection);
        Box::pin(async move {
            match self.connection_status {
                Some(status) => Err(PanelError::Api {
                    status,
                    body: "unauthorized".into(),
                }),
                None => Ok(200),
            }
        })
    }

    fn list_root_files(&self) -> GatewayFuture<'_, Vec<String>> {
        self.record(Call::ListRootFiles);
        Box::pin(async move { Ok(self.listing.clone()) })
    }

    fn compress_files<'a>(&'a self, names: &'a [String]) -> GatewayFuture<'a, String> {
        self.record(Call::Compress(names.to_vec()));
        Box::pin(async move { Ok("archive-2026-10-14.tar.gz".to_string()) })
    }

    fn delete_files<'a>(&'a self, names: &'a [String]) -> GatewayFuture<'a, ()> {
        self.record(Call::Delete(names.to_vec()));
        Box::pin(async move { Ok(()) })
    }

    fn set_power(&self, signal: PowerSignal) -> GatewayFuture<'_, ()> {
        self.record(Call::Power(signal));
        Box::pin(async move { Ok(()) })
    }

    fn write_file<'a>(&'a self, remote_path: &'a str, contents: Vec<u8>) -> GatewayFuture<'a, ()> {
        self.record(Call::Write(remote_path.to_string(), contents));
        Box::pin(async move { Ok(()) })
    }
}

/// Version control double that "clones" a fixed tree.
pub struct FixtureRepo {
    files: Vec<(&'static str, &'static str)>,
    /// Symlinks created after the files: (link inside the clone, target).
    pub links: Vec<(&'static str, PathBuf)>,
    pub installed: bool,
    pub clone_dest: Mutex<Option<PathBuf>>,
}

impl FixtureRepo {
    pub fn new(files: &[(&'static str, &'static str)]) -> Self {
        Self {
            files: files.to_vec(),
            links: Vec::new(),
            installed: true,
            clone_dest: Mutex::new(None),
        }
    }

    pub fn clone_dest(&self) -> Option<PathBuf> {
        self.clone_dest.lock().unwrap().clone()
    }
}

impl VersionControl for FixtureRepo {
    fn check_installed(&self) -> VcsFuture<'_> {
        Box::pin(async move {
            if self.installed {
                Ok(())
            } else {
                Err(DeployError::GitMissing)
            }
        })
    }

    fn clone_shallow<'a>(
        &'a self,
        _address: &'a str,
        _token: &'a str,
        dest: &'a Path,
    ) -> VcsFuture<'a> {
        Box::pin(async move {
            for (rel, contents) in &self.files {
                let path = dest.join(rel);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, contents)?;
            }
            #[cfg(unix)]
            {
                for (link, target) in &self.links {
                    std::os::unix::fs::symlink(target, dest.join(link))?;
                }
            }
            *self.clone_dest.lock().unwrap() = Some(dest.to_path_buf());
            Ok(())
        })
    }
}

/// Command runner double that records the command lines it was given.
#[derive(Default)]
pub struct RecordingRunner {
    pub lines: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(&'a self, argv: &'a [String]) -> CommandFuture<'a> {
        let line = argv.last().cloned().unwrap_or_default();
        self.lines.lock().unwrap().push(line);
        Box::pin(async move {
            Ok(CommandOutcome {
                success: true,
                code: Some(0),
                stderr: String::new(),
            })
        })
    }
}

/// A config with no settle wait.
pub fn config(include: &[&str], exclude: &[&str]) -> DeployConfig {
    let mut config = DeployConfig::default();
    config.git.address = "https://github.com/owner/server.git".into();
    config.git.files.include = include.iter().map(|r| r.to_string()).collect();
    config.git.files.exclude = exclude.iter().map(|r| r.to_string()).collect();
    config.panel.signal.timeout = 0;
    config
}
