//! Project sync: reconcile the remote listing against the local mirror.

use std::sync::Arc;

use gitpulse_db::Database;
use gitpulse_gitlab::{GitApi, RemoteProject};
use gitpulse_types::{BranchName, Project, ProjectId, ValidationError};

use crate::error::SyncError;
use crate::results::ProjectSyncResult;

/// Upserts every remote project and tombstones local live projects the
/// remote no longer lists.
///
/// The remote fetch is all-or-nothing: a failed page mid-pagination
/// aborts the pass before any local write, so a partial listing can
/// never masquerade as "these projects were deleted".
pub struct SyncProjects {
    api: Arc<dyn GitApi>,
    db: Database,
}

impl SyncProjects {
    pub fn new(api: Arc<dyn GitApi>, db: Database) -> Self {
        Self { api, db }
    }

    pub async fn execute(&self) -> ProjectSyncResult {
        match self.run().await {
            Ok(result) => {
                tracing::info!(
                    synced = result.synced_count,
                    deleted = result.deleted_count,
                    "project sync complete"
                );
                result
            }
            Err(err) => {
                tracing::warn!(error = %err, "project sync failed");
                ProjectSyncResult::failed(err.to_string())
            }
        }
    }

    async fn run(&self) -> Result<ProjectSyncResult, SyncError> {
        let remote = self.api.list_projects().await?;

        let projects = remote
            .into_iter()
            .map(to_project)
            .collect::<Result<Vec<_>, _>>()?;

        let synced = self.db.upsert_projects(&projects).await?;

        let keep: Vec<ProjectId> = projects.iter().map(|p| p.id).collect();
        let stale = self.db.find_not_in_project_ids(&keep).await?;
        let stale_ids: Vec<ProjectId> = stale.iter().map(|p| p.id).collect();
        let deleted = self.db.soft_delete_projects(&stale_ids).await?;

        Ok(ProjectSyncResult::ok(synced, deleted))
    }
}

fn to_project(remote: RemoteProject) -> Result<Project, ValidationError> {
    let default_branch = remote.default_branch.map(BranchName::new).transpose()?;
    Project::new(
        ProjectId::new(remote.id)?,
        remote.name_with_namespace,
        remote.description,
        default_branch,
    )
}
