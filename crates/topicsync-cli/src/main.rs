//! topicsync: reconciles declared Kafka topic specs against live clusters.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use topicsync_cli::{telemetry, AppConfig, Runner};
use topicsync_gitops::{ChangesClient, SpecRepo};
use topicsync_kafka::ClusterRegistry;

/// Reconcile declared Kafka topic specs against live clusters.
///
/// Looks up the pull request for the given commit, syncs the spec
/// repository, and creates or updates every topic whose spec file the
/// pull request added or modified.
#[derive(Parser)]
#[command(name = "topicsync", version)]
struct Cli {
    /// Path to the configuration file
    config: PathBuf,

    /// Bitbucket username
    username: String,

    /// Bitbucket password or access token
    password: String,

    /// Commit id whose pull request supplies the changed topic specs
    commit_id: String,

    /// Halt the run on the first execution fault
    #[arg(long)]
    fail_fast: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init("info");

    let config = AppConfig::load(&cli.config)?;
    info!("loaded configuration from {}", cli.config.display());

    let changes_client = ChangesClient::new(
        &config.bitbucket.base_url,
        &config.bitbucket.project_key,
        &config.bitbucket.repository_slug,
        &cli.username,
        &cli.password,
    )?;

    let Some(pull_request_id) = changes_client
        .pull_request_for_commit(&cli.commit_id)
        .await?
    else {
        bail!("no pull request found for commit {}", cli.commit_id);
    };
    info!(
        "pull request {pull_request_id} found for commit {}",
        cli.commit_id
    );

    let changes = changes_client.changed_files(pull_request_id).await?;
    if changes.is_empty() {
        bail!("pull request {pull_request_id} added or modified no topic files");
    }
    for (path, kind) in &changes {
        info!("changed topic file: {path} ({kind})");
    }

    let repo = SpecRepo::new(
        &config.repository.url,
        &config.repository.branch,
        &config.repository.target_dir,
        &cli.username,
        &cli.password,
    );
    repo.clone_or_sync()
        .context("repository synchronization failed")?;

    let registry = ClusterRegistry::new(config.clusters);
    let runner = Runner::new(
        Arc::new(registry),
        config.repository.target_dir.clone(),
        cli.fail_fast || config.fail_fast,
    );
    let report = runner.run(&changes).await;

    info!("{}", report.summary());
    if report.has_failures() {
        bail!("reconciliation run finished with failures");
    }
    Ok(())
}
