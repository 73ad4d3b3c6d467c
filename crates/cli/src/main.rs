use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use flowsync_api::{CredentialSources, Endpoints, credentials};
use flowsync_engine::{DEFAULT_WORKFLOWS_DIR, SyncConfig, SyncError, SyncOptions};
use tracing::{error, info};

/// Import all workflow definitions from a directory into an automation platform instance.
#[derive(Debug, Parser)]
#[command(name = "flowsync", version, about)]
struct Cli {
    /// Update existing workflows instead of skipping them.
    #[arg(long)]
    update: bool,

    /// Base URL of the instance (default: $N8N_URL, then http://localhost:5678).
    #[arg(long)]
    url: Option<String>,

    /// Decide and log every action without writing to the instance.
    #[arg(long)]
    dry_run: bool,

    /// Directory holding workflow definition files.
    #[arg(long, default_value = DEFAULT_WORKFLOWS_DIR)]
    workflows_dir: PathBuf,

    /// File holding N8N_ADMIN_EMAIL and N8N_ADMIN_PASSWORD.
    #[arg(long, default_value = credentials::DEFAULT_SECRET_FILE)]
    secret_file: PathBuf,

    /// File holding a static API key.
    #[arg(long, default_value = credentials::DEFAULT_API_KEY_FILE)]
    api_key_file: PathBuf,
}

impl Cli {
    fn into_config(self) -> Result<SyncConfig> {
        let endpoints = Endpoints::resolve(self.url.as_deref()).context("resolve base URL")?;
        if self.url.is_some() {
            info!(url = %endpoints.base_url(), "using base URL override");
        }
        Ok(SyncConfig::new(endpoints)
            .with_workflows_dir(self.workflows_dir)
            .with_credential_sources(CredentialSources::new(self.secret_file, self.api_key_file))
            .with_options(SyncOptions {
                update_existing: self.update,
                dry_run: self.dry_run,
            }))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.into_config()?;

    let report = match flowsync_engine::run(&config).await {
        Ok(report) => report,
        Err(sync_error) => {
            report_fatal(&sync_error);
            return Ok(ExitCode::FAILURE);
        }
    };

    if !report.is_empty() {
        report.log_summary();
    }
    Ok(ExitCode::from(report.exit_code()))
}

fn report_fatal(sync_error: &SyncError) {
    error!("{sync_error}");
    for step in sync_error.remediation() {
        error!("{step}");
    }
}
