//! Remote API failure classification.

use reqwest::StatusCode;
use thiserror::Error;

/// What went wrong talking to the remote. Callers branch on the kind —
/// auth and not-found are configuration problems, rate-limit and
/// transport are worth retrying later (retry policy belongs to the
/// caller, nothing here retries).
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401/403 — token missing, expired, or lacking scope.
    #[error("authentication rejected by remote (HTTP {status})")]
    Auth { status: u16 },

    /// 429 — the remote asked us to back off.
    #[error("rate limited by remote")]
    RateLimited,

    /// 404 — project or ref does not exist (or the token cannot see it).
    #[error("remote resource not found: {resource}")]
    NotFound { resource: String },

    /// Any other non-success status.
    #[error("unexpected HTTP {status} from remote: {body}")]
    Unexpected { status: u16, body: String },

    /// Connection, TLS, timeout, or response decode failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Maps a non-success status to its kind. `resource` names what was
    /// being fetched so 404 messages stay actionable.
    pub fn from_status(status: StatusCode, resource: &str, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth {
                status: status.as_u16(),
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            StatusCode::NOT_FOUND => Self::NotFound {
                resource: resource.to_string(),
            },
            _ => Self::Unexpected {
                status: status.as_u16(),
                body,
            },
        }
    }
}
