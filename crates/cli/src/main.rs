//! gitpulse binary.
//!
//! Composition root: reads connection settings from the environment,
//! wires the GitLab client and the database into the use cases, and
//! dispatches one subcommand. Results print as JSON on stdout; a run
//! whose result carries `hasErrors` exits non-zero.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use gitpulse_db::Database;
use gitpulse_gitlab::{GitApi, GitLabClient, GitLabConfig};
use gitpulse_sync::{AggregateCommits, CollectCommits, Pipeline, SyncProjects};
use gitpulse_types::{BranchName, ProjectId};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitpulse")]
#[command(about = "Mirror GitLab commit activity into a local database and roll it up per author")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the local project list from GitLab
    Sync,
    /// Pull new commits for one project branch past its stored watermark
    Collect {
        #[arg(long, help = "GitLab project id")]
        project: i64,

        #[arg(long, help = "Branch to collect")]
        branch: String,

        #[arg(long, help = "Collect only commits strictly after this RFC 3339 instant")]
        since: Option<String>,
    },
    /// Recompute the per-author monthly rollup for one project branch
    Aggregate {
        #[arg(long, help = "GitLab project id")]
        project: i64,

        #[arg(long, help = "Branch to aggregate")]
        branch: String,
    },
    /// Sync, then collect and aggregate every live project's default branch
    Run,
    /// Print the stored monthly rollup for one project branch
    Report {
        #[arg(long, help = "GitLab project id")]
        project: i64,

        #[arg(long, help = "Branch to report on")]
        branch: String,
    },
}

/// Database location: `GITPULSE_DB` overrides the per-user cache path.
fn db_path_override() -> Option<PathBuf> {
    std::env::var("GITPULSE_DB").ok().map(PathBuf::from)
}

fn gitlab_config() -> Result<GitLabConfig> {
    let base_url = std::env::var("GITLAB_URL")
        .context("GITLAB_URL is not set (e.g. https://gitlab.example.com)")?;
    let token = std::env::var("GITLAB_TOKEN")
        .context("GITLAB_TOKEN is not set (needs read_api scope)")?;

    let mut config = GitLabConfig::new(base_url, token);
    if let Ok(raw) = std::env::var("GITLAB_TIMEOUT_SECS") {
        let secs: u64 = raw
            .parse()
            .with_context(|| format!("GITLAB_TIMEOUT_SECS is not a number: {raw:?}"))?;
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

async fn open_database() -> Result<Database> {
    let db = match db_path_override() {
        Some(path) => Database::new(&path).await?,
        None => Database::open_default().await?,
    };
    Ok(db)
}

fn remote() -> Result<Arc<dyn GitApi>> {
    let client = GitLabClient::new(gitlab_config()?)?;
    Ok(Arc::new(client))
}

fn parse_project(raw: i64) -> Result<ProjectId> {
    ProjectId::new(raw).context("--project must be a positive id")
}

fn parse_branch(raw: &str) -> Result<BranchName> {
    BranchName::new(raw).context("--branch must not be empty")
}

fn parse_since(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("--since must be RFC 3339, got {raw:?}"))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Prints the result JSON and maps its error flag to the exit code.
fn finish<T: Serialize>(result: &T, has_errors: bool) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "warn,gitpulse_sync=info,gitpulse_db=info,gitpulse_gitlab=info".into()
        }))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync => {
            let db = open_database().await?;
            let result = SyncProjects::new(remote()?, db).execute().await;
            finish(&result, result.has_errors)
        }
        Commands::Collect {
            project,
            branch,
            since,
        } => {
            let project = parse_project(project)?;
            let branch = parse_branch(&branch)?;
            let since = since.as_deref().map(parse_since).transpose()?;

            let db = open_database().await?;
            let result = CollectCommits::new(remote()?, db)
                .execute(project, &branch, since)
                .await;
            finish(&result, result.has_errors)
        }
        Commands::Aggregate { project, branch } => {
            let project = parse_project(project)?;
            let branch = parse_branch(&branch)?;

            let db = open_database().await?;
            let result = AggregateCommits::new(db).execute(project, &branch).await;
            finish(&result, result.has_errors)
        }
        Commands::Run => {
            let db = open_database().await?;
            let summary = Pipeline::new(remote()?, db).run().await?;
            finish(&summary, summary.has_errors())
        }
        Commands::Report { project, branch } => {
            let project = parse_project(project)?;
            let branch = parse_branch(&branch)?;

            let db = open_database().await?;
            let rows = db.list_aggregates(project, &branch).await?;
            finish(&rows, false)
        }
    }
}
