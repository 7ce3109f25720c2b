//! Domain types shared across the gitpulse crates.
//!
//! Everything here is a plain value: validated identifier wrappers,
//! immutable entity snapshots, and the validation error they raise.
//! No I/O, no async — the persistence and API crates depend on this,
//! never the other way around.

pub mod aggregate;
pub mod commit;
pub mod error;
pub mod ids;
pub mod period;
pub mod project;

pub use aggregate::AuthorMonthlyAggregate;
pub use commit::{Commit, CollectionWatermark};
pub use error::{non_negative, ValidationError};
pub use ids::{BranchName, CommitSha, ProjectId};
pub use period::YearMonth;
pub use project::Project;
