//! Use cases that keep the local mirror in step with GitLab.
//!
//! Three operations, each returning a flat result DTO instead of an
//! error: [`SyncProjects`] refreshes the project list and tombstones
//! vanished projects, [`CollectCommits`] pulls new commits for one
//! branch past its stored watermark, and [`AggregateCommits`] recomputes
//! the per-author monthly rollup. [`Pipeline`] chains all three over
//! every live project.

pub mod aggregate_commits;
pub mod collect_commits;
pub mod error;
pub mod locks;
pub mod pipeline;
pub mod results;
pub mod sync_projects;

#[cfg(test)]
mod testutil;

pub use aggregate_commits::AggregateCommits;
pub use collect_commits::CollectCommits;
pub use error::SyncError;
pub use locks::BranchLocks;
pub use pipeline::{BranchRun, Pipeline, PipelineSummary};
pub use results::{AggregationResult, CommitCollectionResult, ProjectSyncResult};
pub use sync_projects::SyncProjects;
