//! Monthly per-author aggregation for one (project, branch).

use std::collections::BTreeMap;

use gitpulse_db::Database;
use gitpulse_types::{
    AuthorMonthlyAggregate, BranchName, Commit, ProjectId, ValidationError, YearMonth,
};

use crate::error::SyncError;
use crate::results::AggregationResult;

/// Recomputes the full monthly rollup from the stored commit set.
///
/// Always a full recompute: every stored commit for the branch is folded
/// and the aggregate rows are replaced wholesale, which makes the
/// operation idempotent and keeps totals consistent with the commits no
/// matter how many collection passes happened in between.
pub struct AggregateCommits {
    db: Database,
}

impl AggregateCommits {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn execute(&self, project_id: ProjectId, branch: &BranchName) -> AggregationResult {
        match self.run(project_id, branch).await {
            Ok(result) => {
                tracing::info!(
                    project = %project_id,
                    branch = %branch,
                    groups = result.aggregated_count,
                    "aggregation complete"
                );
                result
            }
            Err(err) => {
                tracing::warn!(
                    project = %project_id,
                    branch = %branch,
                    error = %err,
                    "aggregation failed"
                );
                AggregationResult::failed(err.to_string())
            }
        }
    }

    async fn run(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
    ) -> Result<AggregationResult, SyncError> {
        let commits = self.db.list_commits(project_id, branch).await?;
        let rows = fold_monthly(project_id, branch, &commits)?;
        let written = self.db.replace_aggregates(project_id, branch, &rows).await?;
        Ok(AggregationResult::ok(written))
    }
}

#[derive(Default)]
struct Bucket {
    additions: i64,
    deletions: i64,
    commits: i64,
    name: Option<String>,
}

/// Groups commits by (author email, UTC month) and sums their line
/// stats. Commits without an author email cannot be attributed and are
/// skipped.
///
/// The representative `author_name` for a group is the name on its most
/// recent commit that carries one; commits are ordered by
/// (committed date, sha) so equal timestamps resolve deterministically.
pub(crate) fn fold_monthly(
    project_id: ProjectId,
    branch: &BranchName,
    commits: &[Commit],
) -> Result<Vec<AuthorMonthlyAggregate>, ValidationError> {
    let mut ordered: Vec<&Commit> = commits.iter().collect();
    ordered.sort_by(|a, b| {
        a.committed_date
            .cmp(&b.committed_date)
            .then_with(|| a.sha.cmp(&b.sha))
    });

    let mut buckets: BTreeMap<(String, YearMonth), Bucket> = BTreeMap::new();
    for commit in ordered {
        let Some(email) = commit.author_email.clone() else {
            continue;
        };
        let period = YearMonth::from_utc(commit.committed_date)?;

        let bucket = buckets.entry((email, period)).or_default();
        bucket.additions += commit.additions;
        bucket.deletions += commit.deletions;
        bucket.commits += 1;
        if commit.author_name.is_some() {
            bucket.name = commit.author_name.clone();
        }
    }

    Ok(buckets
        .into_iter()
        .map(|((author_email, period), bucket)| AuthorMonthlyAggregate {
            project_id,
            branch: branch.clone(),
            author_email,
            period,
            author_name: bucket.name,
            total_additions: bucket.additions,
            total_deletions: bucket.deletions,
            commit_count: bucket.commits,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use gitpulse_types::CommitSha;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testutil::{branch, pid, seed_project, sha};

    fn commit(
        sha_char: char,
        date: DateTime<Utc>,
        email: Option<&str>,
        name: Option<&str>,
        additions: i64,
        deletions: i64,
    ) -> Commit {
        Commit {
            project_id: pid(1),
            branch: branch("main"),
            sha: CommitSha::new(sha(sha_char)).unwrap(),
            message: None,
            committed_date: date,
            author_name: name.map(str::to_string),
            author_email: email.map(str::to_string),
            additions,
            deletions,
        }
    }

    fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn folds_months_separately_for_one_author() {
        // January: 5+10 additions over two commits. February: 3 over one.
        let commits = vec![
            commit('a', at(1, 10, 9), Some("ada@example.com"), Some("Ada"), 5, 2),
            commit('b', at(1, 20, 9), Some("ada@example.com"), Some("Ada"), 10, 1),
            commit('c', at(2, 3, 9), Some("ada@example.com"), Some("Ada"), 3, 0),
        ];

        let rows = fold_monthly(pid(1), &branch("main"), &commits).unwrap();

        assert_eq!(rows.len(), 2);
        let jan = &rows[0];
        assert_eq!(jan.period, YearMonth::new(2025, 1).unwrap());
        assert_eq!(jan.total_additions, 15);
        assert_eq!(jan.total_deletions, 3);
        assert_eq!(jan.commit_count, 2);
        let feb = &rows[1];
        assert_eq!(feb.period, YearMonth::new(2025, 2).unwrap());
        assert_eq!(feb.total_additions, 3);
        assert_eq!(feb.total_deletions, 0);
        assert_eq!(feb.commit_count, 1);
    }

    #[test]
    fn authors_get_separate_rows_keyed_by_email() {
        let commits = vec![
            commit('a', at(1, 10, 9), Some("ada@example.com"), Some("Ada"), 1, 0),
            commit('b', at(1, 11, 9), Some("bob@example.com"), Some("Bob"), 2, 0),
        ];

        let rows = fold_monthly(pid(1), &branch("main"), &commits).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].author_email, "ada@example.com");
        assert_eq!(rows[1].author_email, "bob@example.com");
    }

    #[test]
    fn utc_month_boundary_splits_buckets() {
        let commits = vec![
            commit(
                'a',
                Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap(),
                Some("ada@example.com"),
                Some("Ada"),
                1,
                0,
            ),
            commit(
                'b',
                Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
                Some("ada@example.com"),
                Some("Ada"),
                1,
                0,
            ),
        ];

        let rows = fold_monthly(pid(1), &branch("main"), &commits).unwrap();
        assert_eq!(rows.len(), 2, "one second apart, two different months");
    }

    #[test]
    fn representative_name_is_the_most_recent_named_one() {
        let commits = vec![
            commit('a', at(1, 5, 9), Some("ada@example.com"), Some("A. Lovelace"), 1, 0),
            commit('b', at(1, 20, 9), Some("ada@example.com"), Some("Ada"), 1, 0),
            // Most recent commit has no name; the last named one sticks.
            commit('c', at(1, 25, 9), Some("ada@example.com"), None, 1, 0),
        ];

        let rows = fold_monthly(pid(1), &branch("main"), &commits).unwrap();
        assert_eq!(rows[0].author_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn equal_timestamps_resolve_the_name_by_sha_order() {
        // Same instant; 'b' sorts after 'a', so its name wins.
        let commits = vec![
            commit('b', at(1, 10, 9), Some("ada@example.com"), Some("Newer"), 1, 0),
            commit('a', at(1, 10, 9), Some("ada@example.com"), Some("Older"), 1, 0),
        ];

        let rows = fold_monthly(pid(1), &branch("main"), &commits).unwrap();
        assert_eq!(rows[0].author_name.as_deref(), Some("Newer"));
    }

    #[test]
    fn group_with_no_named_commit_has_no_name() {
        let commits = vec![commit('a', at(1, 10, 9), Some("ada@example.com"), None, 1, 0)];
        let rows = fold_monthly(pid(1), &branch("main"), &commits).unwrap();
        assert_eq!(rows[0].author_name, None);
    }

    #[test]
    fn commits_without_email_are_skipped() {
        let commits = vec![
            commit('a', at(1, 10, 9), None, Some("Ghost"), 100, 100),
            commit('b', at(1, 11, 9), Some("ada@example.com"), Some("Ada"), 1, 0),
        ];

        let rows = fold_monthly(pid(1), &branch("main"), &commits).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].author_email, "ada@example.com");
        assert_eq!(rows[0].total_additions, 1);
    }

    #[test]
    fn empty_commit_set_folds_to_no_rows() {
        let rows = fold_monthly(pid(1), &branch("main"), &[]).unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn execute_persists_groups_and_counts_them() {
        let db = Database::new_in_memory().await.unwrap();
        seed_project(&db, 1).await;
        db.insert_commits_and_advance(
            pid(1),
            &branch("main"),
            &[
                commit('a', at(1, 10, 9), Some("ada@example.com"), Some("Ada"), 5, 2),
                commit('b', at(1, 20, 9), Some("ada@example.com"), Some("Ada"), 10, 1),
                commit('c', at(2, 3, 9), Some("ada@example.com"), Some("Ada"), 3, 0),
            ],
            None,
        )
        .await
        .unwrap();

        let aggregate = AggregateCommits::new(db.clone());
        let result = aggregate.execute(pid(1), &branch("main")).await;

        assert_eq!(result, AggregationResult::ok(2));
        let stored = db.list_aggregates(pid(1), &branch("main")).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].total_additions, 15);
        assert_eq!(stored[1].total_additions, 3);
    }

    #[tokio::test]
    async fn execute_twice_on_unchanged_commits_is_identical() {
        let db = Database::new_in_memory().await.unwrap();
        seed_project(&db, 1).await;
        db.insert_commits_and_advance(
            pid(1),
            &branch("main"),
            &[commit('a', at(1, 10, 9), Some("ada@example.com"), Some("Ada"), 5, 2)],
            None,
        )
        .await
        .unwrap();

        let aggregate = AggregateCommits::new(db.clone());
        let first = aggregate.execute(pid(1), &branch("main")).await;
        let rows_after_first = db.list_aggregates(pid(1), &branch("main")).await.unwrap();

        let second = aggregate.execute(pid(1), &branch("main")).await;
        let rows_after_second = db.list_aggregates(pid(1), &branch("main")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(rows_after_first, rows_after_second);
    }

    #[tokio::test]
    async fn execute_on_empty_branch_clears_and_reports_zero() {
        let db = Database::new_in_memory().await.unwrap();
        seed_project(&db, 1).await;

        let aggregate = AggregateCommits::new(db.clone());
        let result = aggregate.execute(pid(1), &branch("main")).await;

        assert_eq!(result, AggregationResult::ok(0));
        assert!(db
            .list_aggregates(pid(1), &branch("main"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_surfaces_in_the_result() {
        let db = Database::new_in_memory().await.unwrap();
        seed_project(&db, 1).await;
        let aggregate = AggregateCommits::new(db.clone());

        // Closing the pool makes every query fail.
        db.pool().close().await;
        let result = aggregate.execute(pid(1), &branch("main")).await;

        assert!(result.has_errors);
        assert_eq!(result.aggregated_count, 0);
        assert!(result.error_message.is_some());
    }
}
