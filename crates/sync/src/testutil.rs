//! Shared fakes and builders for the use-case tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gitpulse_db::Database;
use gitpulse_gitlab::{ApiError, CommitStats, GitApi, RemoteCommit, RemoteProject};
use gitpulse_types::{BranchName, Project, ProjectId};

/// In-memory [`GitApi`] with failure injection. Honors the trait's
/// strict-`>` since contract so watermark tests exercise the real
/// resume semantics.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub projects: Vec<RemoteProject>,
    pub commits: HashMap<i64, Vec<RemoteCommit>>,
    pub fail_projects: bool,
    pub fail_commits: bool,
    /// Every `since` value `list_commits` was called with.
    pub commit_calls: Mutex<Vec<Option<DateTime<Utc>>>>,
}

impl FakeApi {
    pub fn with_projects(projects: Vec<RemoteProject>) -> Self {
        Self {
            projects,
            ..Self::default()
        }
    }

    pub fn with_commits(project_id: i64, commits: Vec<RemoteCommit>) -> Self {
        let mut map = HashMap::new();
        map.insert(project_id, commits);
        Self {
            commits: map,
            ..Self::default()
        }
    }

    pub fn recorded_since_calls(&self) -> Vec<Option<DateTime<Utc>>> {
        self.commit_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitApi for FakeApi {
    async fn list_projects(&self) -> Result<Vec<RemoteProject>, ApiError> {
        if self.fail_projects {
            return Err(ApiError::Unexpected {
                status: 500,
                body: "listing failed".into(),
            });
        }
        Ok(self.projects.clone())
    }

    async fn list_commits(
        &self,
        project_id: ProjectId,
        _branch: &BranchName,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RemoteCommit>, ApiError> {
        self.commit_calls.lock().unwrap().push(since);
        if self.fail_commits {
            return Err(ApiError::Unexpected {
                status: 500,
                body: "commit fetch failed".into(),
            });
        }
        let all = self
            .commits
            .get(&project_id.get())
            .cloned()
            .unwrap_or_default();
        Ok(all
            .into_iter()
            .filter(|c| since.map_or(true, |s| c.committed_date > s))
            .collect())
    }
}

pub(crate) fn remote_project(id: i64, name: &str, default_branch: Option<&str>) -> RemoteProject {
    RemoteProject {
        id,
        name_with_namespace: name.to_string(),
        description: None,
        default_branch: default_branch.map(str::to_string),
    }
}

pub(crate) fn remote_commit(sha: &str, date: &str, additions: i64, deletions: i64) -> RemoteCommit {
    RemoteCommit {
        id: sha.to_string(),
        message: Some("msg".into()),
        committed_date: date.parse().expect("test date must be RFC 3339"),
        author_name: Some("Ada".into()),
        author_email: Some("ada@example.com".into()),
        stats: Some(CommitStats {
            additions,
            deletions,
        }),
    }
}

/// 40-char sha made of one repeated hex digit.
pub(crate) fn sha(c: char) -> String {
    c.to_string().repeat(40)
}

pub(crate) fn pid(raw: i64) -> ProjectId {
    ProjectId::new(raw).unwrap()
}

pub(crate) fn branch(name: &str) -> BranchName {
    BranchName::new(name).unwrap()
}

/// Insert a live project row so FK-bearing tables accept children.
pub(crate) async fn seed_project(db: &Database, id: i64) {
    let project = Project::new(pid(id), "g / seeded", None, None).unwrap();
    db.upsert_projects(&[project]).await.unwrap();
}
