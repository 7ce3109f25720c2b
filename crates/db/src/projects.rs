//! Project queries: upsert from remote listings, soft delete, and the
//! set-difference read that drives tombstoning.

use chrono::Utc;
use gitpulse_types::{BranchName, Project, ProjectId};

use crate::{Database, DbResult};

/// (id, name_with_namespace, description, default_branch)
type ProjectRow = (i64, String, Option<String>, Option<String>);

fn row_to_project(row: ProjectRow) -> DbResult<Project> {
    let (id, name, description, default_branch) = row;
    let default_branch = default_branch.map(BranchName::new).transpose()?;
    let project = Project::new(ProjectId::new(id)?, name, description, default_branch)?;
    Ok(project)
}

impl Database {
    /// Insert-or-overwrite one row per remote project, in a single
    /// transaction. A soft-deleted project that reappears remotely is
    /// revived (tombstone cleared). Returns the number of rows written.
    pub async fn upsert_projects(&self, projects: &[Project]) -> DbResult<u64> {
        let mut tx = self.pool().begin().await?;
        for p in projects {
            sqlx::query(
                "INSERT INTO projects (id, name_with_namespace, description, default_branch, deleted_at) \
                 VALUES (?1, ?2, ?3, ?4, NULL) \
                 ON CONFLICT(id) DO UPDATE SET \
                     name_with_namespace = excluded.name_with_namespace, \
                     description = excluded.description, \
                     default_branch = excluded.default_branch, \
                     deleted_at = NULL",
            )
            .bind(p.id.get())
            .bind(&p.name_with_namespace)
            .bind(&p.description)
            .bind(p.default_branch.as_ref().map(|b| b.as_str()))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(projects.len() as u64)
    }

    /// Look up one project regardless of tombstone state.
    pub async fn find_project(&self, id: ProjectId) -> DbResult<Option<Project>> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT id, name_with_namespace, description, default_branch \
             FROM projects WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?;
        row.map(row_to_project).transpose()
    }

    /// All projects ordered by id; tombstoned rows only when asked for.
    pub async fn list_projects(&self, include_deleted: bool) -> DbResult<Vec<Project>> {
        let sql = if include_deleted {
            "SELECT id, name_with_namespace, description, default_branch \
             FROM projects ORDER BY id"
        } else {
            "SELECT id, name_with_namespace, description, default_branch \
             FROM projects WHERE deleted_at IS NULL ORDER BY id"
        };
        let rows: Vec<ProjectRow> = sqlx::query_as(sql).fetch_all(self.pool()).await?;
        rows.into_iter().map(row_to_project).collect()
    }

    /// Live projects whose id is NOT in `keep` — the candidates for
    /// tombstoning after a remote listing. An empty `keep` returns every
    /// live project.
    pub async fn find_not_in_project_ids(&self, keep: &[ProjectId]) -> DbResult<Vec<Project>> {
        if keep.is_empty() {
            return self.list_projects(false).await;
        }

        let placeholders = vec!["?"; keep.len()].join(", ");
        let sql = format!(
            "SELECT id, name_with_namespace, description, default_branch \
             FROM projects WHERE deleted_at IS NULL AND id NOT IN ({placeholders}) \
             ORDER BY id"
        );

        let mut query = sqlx::query_as::<_, ProjectRow>(&sql);
        for id in keep {
            query = query.bind(id.get());
        }
        let rows = query.fetch_all(self.pool()).await?;
        rows.into_iter().map(row_to_project).collect()
    }

    /// Tombstone the given projects (idempotent: already-deleted rows are
    /// skipped). Descendant commit/watermark/aggregate rows are left
    /// untouched. Returns the number of rows newly tombstoned.
    pub async fn soft_delete_projects(&self, ids: &[ProjectId]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE projects SET deleted_at = ? \
             WHERE deleted_at IS NULL AND id IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql).bind(Utc::now().timestamp());
        for id in ids {
            query = query.bind(id.get());
        }
        let result = query.execute(self.pool()).await?;
        Ok(result.rows_affected())
    }
}
