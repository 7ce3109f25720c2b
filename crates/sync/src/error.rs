//! Internal error union for the use cases.
//!
//! Nothing here crosses the public `execute` boundary — each use case
//! flattens a [`SyncError`] into its result DTO's `error_message` and
//! logs it, so callers never have to catch anything.

use gitpulse_db::DbError;
use gitpulse_gitlab::ApiError;
use gitpulse_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("remote record failed validation: {0}")]
    Validation(#[from] ValidationError),
}
