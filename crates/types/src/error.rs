//! Validation failures raised by value-object and entity constructors.
//!
//! These fire at the boundary where remote data enters the domain; nothing
//! that fails validation is ever persisted.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("project id must be positive, got {0}")]
    NonPositiveProjectId(i64),

    #[error("branch name must not be empty")]
    EmptyBranchName,

    #[error("commit sha must be exactly 40 hex characters, got {0:?}")]
    MalformedSha(String),

    #[error("project name must be 1..=500 characters, got {0}")]
    ProjectNameLength(usize),

    #[error("year {0} is outside 1..=9999")]
    YearOutOfRange(i32),

    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),

    #[error("{field} must be non-negative, got {value}")]
    NegativeCount { field: &'static str, value: i64 },
}

/// Checks a counter coming off the wire. Line stats are non-negative by
/// construction everywhere downstream; this is the only gate.
pub fn non_negative(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeCount { field, value });
    }
    Ok(value)
}
