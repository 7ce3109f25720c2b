//! Commit queries: existence set-difference, ordered reads, and the
//! collect write path (insert new rows + advance the watermark in one
//! transaction).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use gitpulse_types::{BranchName, Commit, CommitSha, ProjectId};

use crate::{datetime_from_secs, Database, DbResult};

// SQLite caps bound parameters per statement; stay well under it.
const SHA_CHUNK: usize = 400;

/// (sha, message, committed_date, author_name, author_email, additions, deletions)
type CommitRow = (
    String,
    Option<String>,
    i64,
    Option<String>,
    Option<String>,
    i64,
    i64,
);

fn row_to_commit(project_id: ProjectId, branch: &BranchName, row: CommitRow) -> DbResult<Commit> {
    let (sha, message, committed_date, author_name, author_email, additions, deletions) = row;
    Ok(Commit {
        project_id,
        branch: branch.clone(),
        sha: CommitSha::new(sha)?,
        message,
        committed_date: datetime_from_secs(committed_date)?,
        author_name,
        author_email,
        additions,
        deletions,
    })
}

impl Database {
    /// Which of `shas` are already stored for this (project, branch)?
    /// Chunked so arbitrarily large fetches never exceed the bind limit.
    pub async fn existing_shas(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
        shas: &[CommitSha],
    ) -> DbResult<HashSet<CommitSha>> {
        let mut found = HashSet::new();
        for chunk in shas.chunks(SHA_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT sha FROM commits \
                 WHERE project_id = ? AND branch = ? AND sha IN ({placeholders})"
            );

            let mut query = sqlx::query_as::<_, (String,)>(&sql)
                .bind(project_id.get())
                .bind(branch.as_str());
            for sha in chunk {
                query = query.bind(sha.as_str());
            }

            for (sha,) in query.fetch_all(self.pool()).await? {
                found.insert(CommitSha::new(sha)?);
            }
        }
        Ok(found)
    }

    /// All commits for a branch, oldest first, sha as tie-break — the
    /// deterministic order the aggregator folds in.
    pub async fn list_commits(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
    ) -> DbResult<Vec<Commit>> {
        let rows: Vec<CommitRow> = sqlx::query_as(
            "SELECT sha, message, committed_date, author_name, author_email, additions, deletions \
             FROM commits WHERE project_id = ?1 AND branch = ?2 \
             ORDER BY committed_date ASC, sha ASC",
        )
        .bind(project_id.get())
        .bind(branch.as_str())
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| row_to_commit(project_id, branch, row))
            .collect()
    }

    pub async fn count_commits(&self, project_id: ProjectId, branch: &BranchName) -> DbResult<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM commits WHERE project_id = ?1 AND branch = ?2",
        )
        .bind(project_id.get())
        .bind(branch.as_str())
        .fetch_one(self.pool())
        .await?;
        Ok(row.0)
    }

    /// The collect write path, in a single transaction: insert the given
    /// commits (already-present identities are skipped) and, when
    /// `watermark` is set, advance the branch watermark — monotonically,
    /// an older candidate never lowers it. Either everything lands or
    /// nothing does, so stored commits can never get ahead of the
    /// watermark. Returns the number of commit rows actually inserted.
    pub async fn insert_commits_and_advance(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
        commits: &[Commit],
        watermark: Option<DateTime<Utc>>,
    ) -> DbResult<u64> {
        let mut tx = self.pool().begin().await?;

        let mut inserted = 0u64;
        for c in commits {
            let result = sqlx::query(
                "INSERT INTO commits \
                 (project_id, branch, sha, message, committed_date, author_name, author_email, additions, deletions) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
                 ON CONFLICT(project_id, branch, sha) DO NOTHING",
            )
            .bind(project_id.get())
            .bind(branch.as_str())
            .bind(c.sha.as_str())
            .bind(&c.message)
            .bind(c.committed_date.timestamp())
            .bind(&c.author_name)
            .bind(&c.author_email)
            .bind(c.additions)
            .bind(c.deletions)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        if let Some(mark) = watermark {
            sqlx::query(
                "INSERT INTO collection_watermarks (project_id, branch, latest_committed_date) \
                 VALUES (?1, ?2, ?3) \
                 ON CONFLICT(project_id, branch) DO UPDATE SET \
                     latest_committed_date = MAX(latest_committed_date, excluded.latest_committed_date)",
            )
            .bind(project_id.get())
            .bind(branch.as_str())
            .bind(mark.timestamp())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
