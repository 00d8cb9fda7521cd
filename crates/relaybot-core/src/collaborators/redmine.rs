//! Redmine REST client

use serde::{Deserialize, Serialize};

use super::error::{join_segments, CollaboratorError, CollaboratorResult};
use crate::logging::{Logger, NoOpLogger, SharedLogger};
use crate::{log_debug, log_warn};

const SERVICE: &str = "Redmine";
const MAX_LIMIT: u32 = 100;

/// Filters for `GET /issues.json`
#[derive(Debug, Clone, PartialEq)]
pub struct IssueQuery {
    /// Overrides the client's default project
    pub project_id: Option<String>,
    /// `open`, `closed`, `*` or a status id
    pub status: String,
    /// A user id or `me`
    pub assigned_to_id: Option<String>,
    pub limit: u32,
    pub sort: String,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            project_id: None,
            status: "open".to_string(),
            assigned_to_id: None,
            limit: 10,
            sort: "updated_on:desc".to_string(),
        }
    }
}

/// One issue reduced to what the model needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub id: u64,
    pub subject: String,
    pub status: String,
    pub priority: String,
    pub tracker: String,
    pub assigned_to: String,
    pub updated_on: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueList {
    pub total_count: u64,
    pub issues: Vec<IssueSummary>,
}

#[derive(Deserialize)]
struct RawIssues {
    #[serde(default)]
    issues: Vec<RawIssue>,
    #[serde(default)]
    total_count: u64,
}

#[derive(Deserialize)]
struct RawIssue {
    id: u64,
    #[serde(default)]
    subject: String,
    status: Option<Named>,
    priority: Option<Named>,
    tracker: Option<Named>,
    assigned_to: Option<Named>,
    updated_on: Option<String>,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

fn name_or(named: Option<Named>, fallback: &str) -> String {
    named.map(|n| n.name).unwrap_or_else(|| fallback.to_string())
}

/// Client for one Redmine instance
pub struct RedmineClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    default_project_id: Option<String>,
    logger: SharedLogger,
}

impl RedmineClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            default_project_id: None,
            logger: std::sync::Arc::new(NoOpLogger),
        }
    }

    pub fn with_default_project(mut self, project_id: impl Into<String>) -> Self {
        self.default_project_id = Some(project_id.into());
        self
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_project_id(&self) -> Option<&str> {
        self.default_project_id.as_deref()
    }

    /// List issues of the query's project (or the default project)
    ///
    /// `limit` is capped at 100.
    pub async fn list_issues(&self, query: &IssueQuery) -> CollaboratorResult<IssueList> {
        let project_id = query
            .project_id
            .clone()
            .or_else(|| self.default_project_id.clone())
            .ok_or_else(|| CollaboratorError::not_configured(SERVICE, "no project id given and no default project"))?;

        let mut params: Vec<(&str, String)> = vec![
            ("project_id", project_id),
            ("status_id", query.status.clone()),
            ("limit", query.limit.min(MAX_LIMIT).to_string()),
            ("sort", query.sort.clone()),
        ];
        if let Some(assignee) = &query.assigned_to_id {
            params.push(("assigned_to_id", assignee.clone()));
        }

        let url = join_segments(&self.base_url, &["issues.json"])?;
        log_debug!(self.logger, "[RedmineClient] GET {} {:?}", url, params);

        let response = self
            .http
            .get(url)
            .header("X-Redmine-API-Key", &self.api_key)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log_warn!(self.logger, "[RedmineClient] API error {}: {}", status.as_u16(), body);
            return Err(CollaboratorError::api(SERVICE, status.as_u16(), body));
        }

        let raw: RawIssues = serde_json::from_str(&response.text().await?)?;
        let issues = raw
            .issues
            .into_iter()
            .map(|issue| IssueSummary {
                url: format!("{}/issues/{}", self.base_url, issue.id),
                id: issue.id,
                subject: issue.subject,
                status: name_or(issue.status, "Unknown"),
                priority: name_or(issue.priority, "Normal"),
                tracker: name_or(issue.tracker, "Task"),
                assigned_to: name_or(issue.assigned_to, "Unassigned"),
                updated_on: issue.updated_on,
            })
            .collect::<Vec<_>>();

        log_debug!(self.logger, "[RedmineClient] {} issues (total {})", issues.len(), raw.total_count);
        Ok(IssueList {
            total_count: raw.total_count,
            issues,
        })
    }
}
