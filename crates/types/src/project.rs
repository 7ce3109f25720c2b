//! The mirrored GitLab project entity.

use crate::error::ValidationError;
use crate::ids::{BranchName, ProjectId};

/// Local snapshot of a remote project. Projects that vanish from the
/// remote listing are soft-deleted (tombstoned), never removed, so
/// descendant commit and aggregate rows stay readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    /// Human-readable "group / subgroup / name" path. 1..=500 chars.
    pub name_with_namespace: String,
    pub description: Option<String>,
    pub default_branch: Option<BranchName>,
}

impl Project {
    pub fn new(
        id: ProjectId,
        name_with_namespace: impl Into<String>,
        description: Option<String>,
        default_branch: Option<BranchName>,
    ) -> Result<Self, ValidationError> {
        let name_with_namespace = name_with_namespace.into();
        let len = name_with_namespace.chars().count();
        if len == 0 || len > 500 {
            return Err(ValidationError::ProjectNameLength(len));
        }
        Ok(Self {
            id,
            name_with_namespace,
            description,
            default_branch,
        })
    }
}
