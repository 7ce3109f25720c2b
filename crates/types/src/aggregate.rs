//! Monthly per-author productivity rollup.

use serde::Serialize;

use crate::ids::{BranchName, ProjectId};
use crate::period::YearMonth;

/// One aggregation row: everything one author did on one branch in one
/// calendar month. Identity is (project_id, branch, author_email,
/// period); the email is the author key — `author_name` is only a
/// display representative chosen deterministically by the aggregator.
///
/// Rows are produced by full recompute over the stored commit set, so
/// totals are always mutually consistent for their key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorMonthlyAggregate {
    pub project_id: ProjectId,
    pub branch: BranchName,
    pub author_email: String,
    #[serde(flatten)]
    pub period: YearMonth,
    pub author_name: Option<String>,
    pub total_additions: i64,
    pub total_deletions: i64,
    pub commit_count: i64,
}
