//! GitLab access for the sync pipeline: the [`GitApi`] capability trait,
//! its REST v4 implementation, and the error taxonomy remote failures
//! collapse into.

pub mod api;
pub mod client;
pub mod error;

pub use api::{CommitStats, GitApi, RemoteCommit, RemoteProject};
pub use client::{GitLabClient, GitLabConfig};
pub use error::ApiError;
