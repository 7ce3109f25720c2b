//! Sync, collect, and aggregate chained over every live project.

use std::sync::Arc;

use gitpulse_db::{Database, DbError};
use gitpulse_gitlab::GitApi;
use gitpulse_types::{BranchName, ProjectId};
use serde::Serialize;

use crate::aggregate_commits::AggregateCommits;
use crate::collect_commits::CollectCommits;
use crate::locks::BranchLocks;
use crate::results::{AggregationResult, CommitCollectionResult, ProjectSyncResult};
use crate::sync_projects::SyncProjects;

/// Outcome of one project's default branch within a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRun {
    pub project_id: ProjectId,
    pub branch: BranchName,
    pub collection: CommitCollectionResult,
    /// None when collection failed and aggregation was skipped.
    pub aggregation: Option<AggregationResult>,
}

impl BranchRun {
    pub fn has_errors(&self) -> bool {
        self.collection.has_errors
            || self.aggregation.as_ref().is_some_and(|a| a.has_errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub sync: ProjectSyncResult,
    pub branches: Vec<BranchRun>,
}

impl PipelineSummary {
    pub fn has_errors(&self) -> bool {
        self.sync.has_errors || self.branches.iter().any(BranchRun::has_errors)
    }
}

/// Runs the three use cases in order: project sync, then per live
/// project an incremental collection and a full re-aggregation of its
/// default branch.
pub struct Pipeline {
    sync: SyncProjects,
    collect: CollectCommits,
    aggregate: AggregateCommits,
    db: Database,
    locks: BranchLocks,
}

impl Pipeline {
    pub fn new(api: Arc<dyn GitApi>, db: Database) -> Self {
        Self {
            sync: SyncProjects::new(api.clone(), db.clone()),
            collect: CollectCommits::new(api, db.clone()),
            aggregate: AggregateCommits::new(db.clone()),
            db,
            locks: BranchLocks::new(),
        }
    }

    /// Individual step failures land in the summary, not in `Err`;
    /// `Err` is reserved for being unable to read the project list at
    /// all.
    pub async fn run(&self) -> Result<PipelineSummary, DbError> {
        let sync = self.sync.execute().await;
        if sync.has_errors {
            // Without a current project list the branch work would run
            // against stale rows. Surface the failure and stop.
            return Ok(PipelineSummary {
                sync,
                branches: Vec::new(),
            });
        }

        let projects = self.db.list_projects(false).await?;
        let mut branches = Vec::new();
        for project in projects {
            let Some(branch) = project.default_branch else {
                tracing::info!(
                    project = %project.id,
                    "project has no default branch, skipping"
                );
                continue;
            };

            let _guard = self.locks.acquire(project.id, &branch).await;
            let collection = self.collect.execute(project.id, &branch, None).await;
            let aggregation = if collection.has_errors {
                None
            } else {
                Some(self.aggregate.execute(project.id, &branch).await)
            };
            branches.push(BranchRun {
                project_id: project.id,
                branch,
                collection,
                aggregation,
            });
        }

        let summary = PipelineSummary { sync, branches };
        tracing::info!(
            projects = summary.branches.len(),
            has_errors = summary.has_errors(),
            "pipeline finished"
        );
        Ok(summary)
    }
}
