//! Result DTOs the use cases hand to their callers.
//!
//! These are the public contract of the pipeline: flat counters plus an
//! error flag, serializable as-is for whatever presentation sits on top.
//! A use case never raises — failure comes back as `has_errors = true`
//! with the message verbatim.

use serde::Serialize;

/// Outcome of one project sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSyncResult {
    /// Remote projects upserted (inserted or overwritten).
    pub synced_count: u64,
    /// Local live projects tombstoned because the remote no longer
    /// listed them.
    pub deleted_count: u64,
    pub has_errors: bool,
    pub error_message: Option<String>,
}

impl ProjectSyncResult {
    pub fn ok(synced_count: u64, deleted_count: u64) -> Self {
        Self {
            synced_count,
            deleted_count,
            has_errors: false,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            synced_count: 0,
            deleted_count: 0,
            has_errors: true,
            error_message: Some(message.into()),
        }
    }
}

/// Outcome of one commit collection pass for a (project, branch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitCollectionResult {
    /// Commits the remote returned past the effective start.
    pub collected_count: u64,
    /// Commits actually persisted after dropping already-stored shas.
    pub saved_count: u64,
    pub has_errors: bool,
    pub error_message: Option<String>,
}

impl CommitCollectionResult {
    pub fn ok(collected_count: u64, saved_count: u64) -> Self {
        Self {
            collected_count,
            saved_count,
            has_errors: false,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            collected_count: 0,
            saved_count: 0,
            has_errors: true,
            error_message: Some(message.into()),
        }
    }
}

/// Outcome of one aggregation recompute for a (project, branch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Distinct (author, month) groups written.
    pub aggregated_count: u64,
    pub has_errors: bool,
    pub error_message: Option<String>,
}

impl AggregationResult {
    pub fn ok(aggregated_count: u64) -> Self {
        Self {
            aggregated_count,
            has_errors: false,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            aggregated_count: 0,
            has_errors: true,
            error_message: Some(message.into()),
        }
    }
}
