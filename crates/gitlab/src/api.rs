//! The remote-API capability the sync pipeline consumes, plus the wire
//! shapes it yields.
//!
//! Use cases depend on [`GitApi`], never on a concrete client, so tests
//! substitute an in-memory fake and the pipeline stays transport-free.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gitpulse_types::{BranchName, ProjectId};
use serde::Deserialize;

use crate::error::ApiError;

/// Read access to the remote git host.
///
/// Implementations own pagination: each method returns the complete
/// result set or an error, never a partial page.
#[async_trait]
pub trait GitApi: Send + Sync {
    /// Every project the credential can see. A failure on any page fails
    /// the whole listing.
    async fn list_projects(&self) -> Result<Vec<RemoteProject>, ApiError>;

    /// Commits on `branch` with committed date strictly after `since`
    /// (full history when `None`). Strictness is part of this contract:
    /// a commit at exactly `since` is never returned, so callers can use
    /// a stored high-water mark as an exclusive resume point.
    async fn list_commits(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RemoteCommit>, ApiError>;
}

/// Project row as the remote serves it. Field names follow the GitLab
/// v4 payload; validation into domain types happens downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProject {
    pub id: i64,
    pub name_with_namespace: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Commit row from `/repository/commits`. `committed_date` arrives as
/// RFC 3339 with an arbitrary offset; chrono normalizes it to UTC on
/// deserialize. `stats` is only present when requested (`with_stats`)
/// and missing counts as zero lines.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCommit {
    /// Full 40-char sha.
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    pub committed_date: DateTime<Utc>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub stats: Option<CommitStats>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CommitStats {
    pub additions: i64,
    pub deletions: i64,
}
