//! GitLab REST client (merge requests only)

use serde_json::Value;

use super::error::{join_segments, CollaboratorError, CollaboratorResult};
use crate::logging::{Logger, NoOpLogger, SharedLogger};
use crate::{log_debug, log_warn};

const SERVICE: &str = "GitLab";

/// Client for `{base}/api/v4`, authenticated with a private token
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    logger: SharedLogger,
}

impl GitLabClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
            logger: std::sync::Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Merge requests of `project` (numeric id or `group/name` path) in `state`
    pub async fn list_merge_requests(&self, project: &str, state: &str) -> CollaboratorResult<Value> {
        self.get(&[project, "merge_requests"], &[("state", state)]).await
    }

    /// One merge request with its diffs
    pub async fn merge_request_changes(&self, project: &str, iid: u64) -> CollaboratorResult<Value> {
        let iid = iid.to_string();
        self.get(&[project, "merge_requests", &iid, "changes"], &[]).await
    }

    pub async fn merge_request_commits(&self, project: &str, iid: u64) -> CollaboratorResult<Value> {
        let iid = iid.to_string();
        self.get(&[project, "merge_requests", &iid, "commits"], &[]).await
    }

    async fn get(&self, project_path: &[&str], query: &[(&str, &str)]) -> CollaboratorResult<Value> {
        let mut segments = vec!["api", "v4", "projects"];
        segments.extend_from_slice(project_path);
        let url = join_segments(&self.base_url, &segments)?;
        log_debug!(self.logger, "[GitLabClient] GET {}", url);

        let response = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log_warn!(self.logger, "[GitLabClient] API error {}: {}", status.as_u16(), body);
            return Err(CollaboratorError::api(SERVICE, status.as_u16(), body));
        }
        Ok(serde_json::from_str(&response.text().await?)?)
    }
}
