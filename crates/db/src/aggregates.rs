//! Aggregate rows: full-replace write and the ordered dashboard read.

use gitpulse_types::{AuthorMonthlyAggregate, BranchName, ProjectId, YearMonth};

use crate::{Database, DbResult};

/// (author_email, year, month, author_name, total_additions, total_deletions, commit_count)
type AggregateRow = (String, i64, i64, Option<String>, i64, i64, i64);

fn row_to_aggregate(
    project_id: ProjectId,
    branch: &BranchName,
    row: AggregateRow,
) -> DbResult<AuthorMonthlyAggregate> {
    let (author_email, year, month, author_name, total_additions, total_deletions, commit_count) =
        row;
    Ok(AuthorMonthlyAggregate {
        project_id,
        branch: branch.clone(),
        author_email,
        period: YearMonth::new(year as i32, month as u32)?,
        author_name,
        total_additions,
        total_deletions,
        commit_count,
    })
}

impl Database {
    /// Replace every aggregate row for (project, branch) with `rows`, in
    /// one transaction — the idempotent full recompute. Returns the
    /// number of rows written.
    pub async fn replace_aggregates(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
        rows: &[AuthorMonthlyAggregate],
    ) -> DbResult<u64> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "DELETE FROM author_monthly_aggregates WHERE project_id = ?1 AND branch = ?2",
        )
        .bind(project_id.get())
        .bind(branch.as_str())
        .execute(&mut *tx)
        .await?;

        for row in rows {
            sqlx::query(
                "INSERT INTO author_monthly_aggregates \
                 (project_id, branch, author_email, year, month, author_name, total_additions, total_deletions, commit_count) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .bind(project_id.get())
            .bind(branch.as_str())
            .bind(&row.author_email)
            .bind(i64::from(row.period.year()))
            .bind(i64::from(row.period.month()))
            .bind(&row.author_name)
            .bind(row.total_additions)
            .bind(row.total_deletions)
            .bind(row.commit_count)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(rows.len() as u64)
    }

    /// Stored aggregates for a branch, ordered by author then period —
    /// the shape the dashboard renders directly.
    pub async fn list_aggregates(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
    ) -> DbResult<Vec<AuthorMonthlyAggregate>> {
        let rows: Vec<AggregateRow> = sqlx::query_as(
            "SELECT author_email, year, month, author_name, total_additions, total_deletions, commit_count \
             FROM author_monthly_aggregates \
             WHERE project_id = ?1 AND branch = ?2 \
             ORDER BY author_email ASC, year ASC, month ASC",
        )
        .bind(project_id.get())
        .bind(branch.as_str())
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| row_to_aggregate(project_id, branch, row))
            .collect()
    }
}
