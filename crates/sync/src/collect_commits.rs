//! Incremental commit collection for one (project, branch).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gitpulse_db::Database;
use gitpulse_gitlab::{GitApi, RemoteCommit};
use gitpulse_types::{non_negative, BranchName, Commit, CommitSha, ProjectId, ValidationError};

use crate::error::SyncError;
use crate::results::CommitCollectionResult;

/// Fetches commits past a resume point and persists the new ones.
///
/// The resume point, in priority order: an explicit `since` argument,
/// else the stored branch watermark, else nothing (full history). The
/// fetch is strictly exclusive of the resume point, so a commit at
/// exactly the watermark is never re-fetched. New rows and the advanced
/// watermark land in one transaction; on any failure nothing is
/// persisted.
pub struct CollectCommits {
    api: Arc<dyn GitApi>,
    db: Database,
}

impl CollectCommits {
    pub fn new(api: Arc<dyn GitApi>, db: Database) -> Self {
        Self { api, db }
    }

    pub async fn execute(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
        since: Option<DateTime<Utc>>,
    ) -> CommitCollectionResult {
        match self.run(project_id, branch, since).await {
            Ok(result) => {
                tracing::info!(
                    project = %project_id,
                    branch = %branch,
                    collected = result.collected_count,
                    saved = result.saved_count,
                    "commit collection complete"
                );
                result
            }
            Err(err) => {
                tracing::warn!(
                    project = %project_id,
                    branch = %branch,
                    error = %err,
                    "commit collection failed"
                );
                CommitCollectionResult::failed(err.to_string())
            }
        }
    }

    async fn run(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
        since: Option<DateTime<Utc>>,
    ) -> Result<CommitCollectionResult, SyncError> {
        let effective_start = match since {
            Some(explicit) => Some(explicit),
            None => self.db.watermark(project_id, branch).await?,
        };

        let fetched = self
            .api
            .list_commits(project_id, branch, effective_start)
            .await?;
        let collected = fetched.len() as u64;

        // The watermark candidate spans ALL fetched commits, not just the
        // ones that turn out to be new — an overlapping explicit-since run
        // must still account for what it saw.
        let candidate_mark = fetched.iter().map(|c| c.committed_date).max();

        let commits = fetched
            .into_iter()
            .map(|remote| to_commit(project_id, branch, remote))
            .collect::<Result<Vec<_>, _>>()?;

        let all_shas: Vec<CommitSha> = commits.iter().map(|c| c.sha.clone()).collect();
        let existing = self.db.existing_shas(project_id, branch, &all_shas).await?;
        let new_commits: Vec<Commit> = commits
            .into_iter()
            .filter(|c| !existing.contains(&c.sha))
            .collect();

        let saved = self
            .db
            .insert_commits_and_advance(project_id, branch, &new_commits, candidate_mark)
            .await?;

        Ok(CommitCollectionResult::ok(collected, saved))
    }
}

fn to_commit(
    project_id: ProjectId,
    branch: &BranchName,
    remote: RemoteCommit,
) -> Result<Commit, ValidationError> {
    let stats = remote.stats.unwrap_or_default();
    Ok(Commit {
        project_id,
        branch: branch.clone(),
        sha: CommitSha::new(remote.id)?,
        message: remote.message,
        committed_date: remote.committed_date,
        author_name: remote.author_name,
        author_email: remote.author_email,
        additions: non_negative("additions", stats.additions)?,
        deletions: non_negative("deletions", stats.deletions)?,
    })
}
