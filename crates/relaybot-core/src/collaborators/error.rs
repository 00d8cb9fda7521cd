//! REST collaborator error types

use thiserror::Error;

/// Errors from the issue tracker and version-control REST clients
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// URL, credentials or project missing
    #[error("{service} is not configured: {detail}")]
    NotConfigured { service: String, detail: String },

    /// Non-2xx response
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CollaboratorError {
    pub fn not_configured(service: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NotConfigured {
            service: service.into(),
            detail: detail.into(),
        }
    }

    pub fn api(service: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            service: service.into(),
            status,
            body: body.into(),
        }
    }
}

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Append path segments to a base URL, percent-encoding each one
///
/// A segment containing `/` (a GitLab project path) is encoded as `%2F`.
pub(crate) fn join_segments(base: &str, segments: &[&str]) -> CollaboratorResult<reqwest::Url> {
    let mut url = reqwest::Url::parse(base).map_err(|e| CollaboratorError::InvalidUrl(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| CollaboratorError::InvalidUrl(format!("{} cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
