//! WingFlow command line.
//!
//! Deploys a git repository to a Pterodactyl-hosted server: clone, pick
//! files, back up and wipe the server, upload, restart.

mod config;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wingflow_deploy::{Deployment, EventSender, GitCli, ShellRunner, SyncReport};
use wingflow_panel::Client;

#[derive(Parser)]
#[command(name = "wflow")]
#[command(version)]
#[command(about = "Deploy a git repository to a Pterodactyl server")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .wflow config file
    Init {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy using the .wflow config file
    Run {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

/// How a finished run is reported to the shell.
enum Outcome {
    Complete,
    Partial,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Complete => ExitCode::SUCCESS,
            Outcome::Partial => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color);

    match run(cli.command) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, no_color: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(use_color(no_color))
        .init();
}

fn use_color(no_color: bool) -> bool {
    if no_color || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var("TERM").is_ok_and(|t| t == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn run(command: Commands) -> anyhow::Result<Outcome> {
    match command {
        Commands::Init { dir, force } => {
            let path = config::create(&dir, force)?;
            info!(path = %path.display(), "created config file");
            Ok(Outcome::Complete)
        }
        Commands::Run { dir } => {
            let config = config::load(&dir)?;

            let rt = tokio::runtime::Runtime::new()?;
            let report = rt.block_on(deploy(&config))?;
            Ok(summarize(&report))
        }
    }
}

async fn deploy(config: &wingflow_deploy::DeployConfig) -> anyhow::Result<SyncReport> {
    let panel = Client::new(&config.panel.url, &config.panel.key, &config.panel.id)?;
    let git = GitCli::default();

    let (events, rx) = EventSender::channel();
    let renderer = tokio::spawn(render::drain(rx));

    let result = Deployment::new(config, &panel, &git, &ShellRunner, events)
        .run()
        .await;
    let _ = renderer.await;

    match result {
        Ok(report) => Ok(report),
        Err(failure) => {
            if failure.remote_modified() {
                match &failure.backup_archive {
                    Some(archive) => error!(
                        archive = %archive,
                        "server files may be incomplete; restore from the backup archive"
                    ),
                    None => error!("server files may be incomplete and no backup was created"),
                }
            }
            if !failure.warnings.is_empty() {
                warn!(
                    count = failure.warnings.len(),
                    "warnings were reported before the failure"
                );
            }
            Err(failure.into())
        }
    }
}

fn summarize(report: &SyncReport) -> Outcome {
    if !report.warnings.is_empty() {
        warn!(count = report.warnings.len(), "deploy finished with warnings");
    }

    if report.is_partial() {
        for path in &report.upload.failed {
            warn!(file = %path.display(), "not uploaded");
        }
        if let Some(archive) = &report.backup_archive {
            warn!(archive = %archive, "previous server files are kept in the backup archive");
        }
        warn!(
            succeeded = report.upload.succeeded,
            failed = report.upload.failed.len(),
            "deploy finished with failed uploads"
        );
        Outcome::Partial
    } else {
        info!(files = report.upload.succeeded, "deploy complete");
        Outcome::Complete
    }
}
