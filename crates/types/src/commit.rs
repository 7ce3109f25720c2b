//! Commit snapshots and the per-branch collection watermark.

use chrono::{DateTime, Utc};

use crate::ids::{BranchName, CommitSha, ProjectId};

/// One mirrored commit. Identity is (project_id, branch, sha) — the same
/// sha collected on two branches is two rows. Written once and never
/// updated; a re-collection that sees an already-stored sha drops it.
///
/// `additions`/`deletions` are line stats from the remote; callers
/// validate non-negativity at the wire boundary (see
/// [`crate::error::non_negative`]) before a `Commit` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub project_id: ProjectId,
    pub branch: BranchName,
    pub sha: CommitSha,
    pub message: Option<String>,
    pub committed_date: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub additions: i64,
    pub deletions: i64,
}

/// Exclusive resume point for commit collection: one row per
/// (project, branch), holding the newest committed date ever observed.
/// Advances monotonically; a missing row means "never collected", which
/// is distinct from "collected and saw nothing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionWatermark {
    pub project_id: ProjectId,
    pub branch: BranchName,
    pub latest_committed_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample(sha: &str) -> Commit {
        Commit {
            project_id: ProjectId::new(1).unwrap(),
            branch: BranchName::new("main").unwrap(),
            sha: CommitSha::new(sha.repeat(40)).unwrap(),
            message: Some("fix: parser".into()),
            committed_date: Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
            author_name: Some("Ada".into()),
            author_email: Some("ada@example.com".into()),
            additions: 5,
            deletions: 2,
        }
    }

    #[test]
    fn structural_equality() {
        assert_eq!(sample("a"), sample("a"));
        assert_ne!(sample("a"), sample("b"));

        let mut tweaked = sample("a");
        tweaked.additions = 6;
        assert_ne!(sample("a"), tweaked);
    }
}
