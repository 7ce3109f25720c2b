//! Watermark reads. The write side lives in
//! [`Database::insert_commits_and_advance`](crate::Database::insert_commits_and_advance)
//! so commits and their watermark move in one transaction.

use chrono::{DateTime, Utc};
use gitpulse_types::{BranchName, CollectionWatermark, ProjectId};

use crate::{datetime_from_secs, Database, DbResult};

impl Database {
    /// Full watermark row, `None` when the branch was never collected.
    pub async fn collection_watermark(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
    ) -> DbResult<Option<CollectionWatermark>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT latest_committed_date FROM collection_watermarks \
             WHERE project_id = ?1 AND branch = ?2",
        )
        .bind(project_id.get())
        .bind(branch.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(|(secs,)| {
            Ok(CollectionWatermark {
                project_id,
                branch: branch.clone(),
                latest_committed_date: datetime_from_secs(secs)?,
            })
        })
        .transpose()
    }

    /// Just the resume point.
    pub async fn watermark(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
    ) -> DbResult<Option<DateTime<Utc>>> {
        Ok(self
            .collection_watermark(project_id, branch)
            .await?
            .map(|w| w.latest_committed_date))
    }
}
