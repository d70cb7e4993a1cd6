//! Pre-run and post-run commands.
//!
//! Commands are independent: each one runs to completion, and a failure is
//! reported as a [`Warning`] before moving on to the next.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tracing::{info, warn};

use crate::error::Warning;
use crate::types::{EventSender, SyncEvent};

/// Exit information of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

/// A boxed future returned by [`CommandRunner::run`].
pub type CommandFuture<'a> =
    Pin<Box<dyn Future<Output = std::io::Result<CommandOutcome>> + Send + 'a>>;

/// Spawns external commands.
pub trait CommandRunner: Send + Sync {
    /// Runs `argv[0]` with the remaining arguments and waits for it.
    fn run<'a>(&'a self, argv: &'a [String]) -> CommandFuture<'a>;
}

/// Runs commands with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run<'a>(&'a self, argv: &'a [String]) -> CommandFuture<'a> {
        Box::pin(async move {
            let Some((program, args)) = argv.split_first() else {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "empty command",
                ));
            };

            let output = tokio::process::Command::new(program)
                .args(args)
                .stdin(std::process::Stdio::null())
                .output()
                .await?;

            Ok(CommandOutcome {
                success: output.status.success(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        })
    }
}

/// When a hook list runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    PreRun,
    PostRun,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PreRun => "pre-run",
            Self::PostRun => "post-run",
        })
    }
}

/// Wraps a command line in the platform shell.
pub fn shell_argv(line: &str) -> Vec<String> {
    if cfg!(windows) {
        vec!["cmd".into(), "/C".into(), line.into()]
    } else {
        vec!["sh".into(), "-c".into(), line.into()]
    }
}

/// Runs each command line in order and returns the warnings for failures.
pub async fn run_hooks(
    runner: &dyn CommandRunner,
    commands: &[String],
    phase: HookPhase,
    events: &EventSender,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for line in commands {
        if line.trim().is_empty() {
            continue;
        }
        info!(%phase, command = %line, "running command");

        let argv = shell_argv(line);
        let error = match runner.run(&argv).await {
            Ok(outcome) if outcome.success => continue,
            Ok(outcome) => match (outcome.code, outcome.stderr.is_empty()) {
                (Some(code), true) => format!("exited with status {code}"),
                (Some(code), false) => format!("exited with status {code}: {}", outcome.stderr),
                (None, _) => "terminated by signal".to_string(),
            },
            Err(e) => format!("could not start: {e}"),
        };

        warn!(%phase, command = %line, error = %error, "command failed");
        let warning = Warning::ExternalCommand {
            command: line.clone(),
            error,
        };
        events.emit(SyncEvent::Warning(warning.clone()));
        warnings.push(warning);
    }

    warnings
}
