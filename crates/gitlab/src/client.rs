//! GitLab v4 REST client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use gitpulse_types::{BranchName, ProjectId};
use serde::de::DeserializeOwned;

use crate::api::{GitApi, RemoteCommit, RemoteProject};
use crate::error::ApiError;

const PER_PAGE: u32 = 100;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`GitLabClient`]. The composition root fills
/// this from the environment; tests point it at a local mock server.
#[derive(Debug, Clone)]
pub struct GitLabConfig {
    /// Instance base URL without the `/api/v4` suffix,
    /// e.g. `https://gitlab.example.com`.
    pub base_url: String,
    /// Personal/project access token with at least `read_api` scope.
    pub token: String,
    /// Per-request timeout. A request that exceeds it fails as
    /// [`ApiError::Transport`].
    pub timeout: Duration,
}

impl GitLabConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`GitApi`] over GitLab's REST v4. Authenticates with the
/// `PRIVATE-TOKEN` header and walks offset pagination via the
/// `x-next-page` response header until the listing is exhausted.
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitLabClient {
    pub fn new(config: GitLabConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    /// Fetches one page; returns the rows plus the next page number when
    /// the `x-next-page` header names one.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        resource: &str,
    ) -> Result<(Vec<T>, Option<u32>), ApiError> {
        let resp = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, resource, body));
        }

        // Blank header value on the last page.
        let next_page = resp
            .headers()
            .get("x-next-page")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok());

        let items = resp.json::<Vec<T>>().await?;
        Ok((items, next_page))
    }

    /// Walks every page of a listing. Any page failure fails the whole
    /// call, so callers never observe a partial result set.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        base_query: &[(&str, String)],
        resource: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = format!("{}/api/v4/{path}", self.base_url);
        let mut page = 1u32;
        let mut out: Vec<T> = Vec::new();
        loop {
            let mut query = base_query.to_vec();
            query.push(("per_page", PER_PAGE.to_string()));
            query.push(("page", page.to_string()));

            let (items, next_page) = self.fetch_page(&url, &query, resource).await?;
            tracing::debug!(resource, page, rows = items.len(), "fetched page");
            out.extend(items);

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl GitApi for GitLabClient {
    async fn list_projects(&self) -> Result<Vec<RemoteProject>, ApiError> {
        let query = [
            ("membership", "true".to_string()),
            ("archived", "false".to_string()),
        ];
        self.fetch_all("projects", &query, "projects").await
    }

    async fn list_commits(
        &self,
        project_id: ProjectId,
        branch: &BranchName,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RemoteCommit>, ApiError> {
        let mut query = vec![
            ("ref_name", branch.as_str().to_string()),
            ("with_stats", "true".to_string()),
        ];
        if let Some(s) = since {
            query.push(("since", s.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        let path = format!("projects/{}/repository/commits", project_id.get());
        let resource = format!("project {project_id} branch {branch}");
        let mut commits: Vec<RemoteCommit> =
            self.fetch_all(&path, &query, &resource).await?;

        // GitLab's `since` is inclusive; the trait promises strict `>`.
        if let Some(s) = since {
            commits.retain(|c| c.committed_date > s);
        }
        Ok(commits)
    }
}
