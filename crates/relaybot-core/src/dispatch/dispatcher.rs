//! Tool dispatcher

use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::handlers::{apply_defaults, GitLabAction, Handler, RedmineAction, RemoteRoute, HANDLERS};
use super::local::control_light;
use crate::bridge::RemoteTools;
use crate::collaborators::{CollaboratorError, GitLabClient, IssueQuery, RedmineClient};
use crate::logging::{Logger, SharedLogger};
use crate::types::{ToolCallRequest, ToolOutcome};
use crate::{log_info, log_warn};

/// Routes tool calls to local actions, REST collaborators or the remote bridge
///
/// Every path ends in a `ToolOutcome`; nothing here returns an error.
pub struct Dispatcher {
    remote: Arc<dyn RemoteTools>,
    redmine: Option<RedmineClient>,
    gitlab: Option<GitLabClient>,
    default_project_id: Option<String>,
    logger: SharedLogger,
}

impl Dispatcher {
    pub fn new(remote: Arc<dyn RemoteTools>, logger: SharedLogger) -> Self {
        Self {
            remote,
            redmine: None,
            gitlab: None,
            default_project_id: None,
            logger,
        }
    }

    pub fn with_redmine(mut self, client: RedmineClient) -> Self {
        self.redmine = Some(client);
        self
    }

    pub fn with_gitlab(mut self, client: GitLabClient) -> Self {
        self.gitlab = Some(client);
        self
    }

    /// Project used by project-scoped remote tools when the model gives none
    pub fn with_default_project(mut self, project_id: impl Into<String>) -> Self {
        self.default_project_id = Some(project_id.into());
        self
    }

    /// Every function name this dispatcher can route, sorted
    pub fn tool_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = HANDLERS.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn handler(name: &str) -> Option<Handler> {
        HANDLERS.get(name).copied()
    }

    /// Parse a model-issued call and dispatch it
    ///
    /// Malformed arguments fail this call only.
    pub async fn dispatch_call(&self, call: &ToolCallRequest) -> ToolOutcome {
        match call.parse_arguments() {
            Ok(args) => self.dispatch(call.name(), args).await,
            Err(e) => {
                log_warn!(self.logger, "[Dispatcher] Bad arguments for {}: {}", call.name(), e);
                ToolOutcome::failure_with_error(
                    "Invalid arguments",
                    format!("Could not parse arguments for {}: {}", call.name(), e),
                )
            }
        }
    }

    /// Dispatch by function name with structured arguments
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolOutcome {
        let handler = match Self::handler(name) {
            Some(handler) => handler,
            None => {
                log_warn!(self.logger, "[Dispatcher] Unknown tool call: {}", name);
                return ToolOutcome::failure(format!("Unknown function: {}", name));
            }
        };
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return ToolOutcome::failure_with_error(
                    "Invalid arguments",
                    format!("Arguments for {} must be an object, got {}", name, other),
                )
            }
        };

        log_info!(self.logger, "[Dispatcher] {} -> {:?}", name, handler);
        match handler {
            Handler::Local(_) => control_light(&Value::Object(args)),
            Handler::Redmine(action) => self.redmine(action, &args).await,
            Handler::GitLab(action) => self.gitlab(action, &args).await,
            Handler::Remote(route) => self.remote(route, args).await,
        }
    }

    async fn remote(&self, route: RemoteRoute, mut args: Map<String, Value>) -> ToolOutcome {
        apply_defaults(&mut args, route.defaults);
        if route.project_scoped {
            if let Some(project) = &self.default_project_id {
                if args.get("project_id").map_or(true, Value::is_null) {
                    args.insert("project_id".to_string(), json!(project));
                }
            }
        }
        self.remote.call_tool(route.key, Value::Object(args)).await
    }

    async fn redmine(&self, action: RedmineAction, args: &Map<String, Value>) -> ToolOutcome {
        let client = match &self.redmine {
            Some(client) => client,
            None => {
                return ToolOutcome::failure(
                    "Redmine is not configured. Set REDMINE_URL, REDMINE_API_KEY and REDMINE_DEFAULT_PROJECT_ID",
                )
            }
        };

        match action {
            RedmineAction::ListIssues => {
                let defaults = IssueQuery::default();
                let query = IssueQuery {
                    project_id: string_arg(args, "project_id"),
                    status: string_arg(args, "status").unwrap_or(defaults.status),
                    assigned_to_id: string_arg(args, "assigned_to_id"),
                    limit: args
                        .get("limit")
                        .and_then(Value::as_f64)
                        .filter(|l| *l >= 1.0)
                        .map(|l| l.min(u32::MAX as f64) as u32)
                        .unwrap_or(defaults.limit),
                    sort: string_arg(args, "sort").unwrap_or(defaults.sort),
                };
                match client.list_issues(&query).await {
                    Ok(list) => ToolOutcome::ok(format!(
                        "Found {} issues (total: {})",
                        list.issues.len(),
                        list.total_count
                    ))
                    .field("total_count", list.total_count)
                    .field("issues", json!(list.issues)),
                    Err(e) => collaborator_failure("Could not list issues", e),
                }
            }
        }
    }

    async fn gitlab(&self, action: GitLabAction, args: &Map<String, Value>) -> ToolOutcome {
        let client = match &self.gitlab {
            Some(client) => client,
            None => return ToolOutcome::failure("GitLab is not configured. Set GITLAB_URL and GITLAB_TOKEN"),
        };
        let project = match string_arg(args, "project_id").or_else(|| string_arg(args, "project_path")) {
            Some(project) => project,
            None => return missing_argument("project_id"),
        };

        let result = match action {
            GitLabAction::ListMergeRequests => {
                let state = string_arg(args, "state").unwrap_or_else(|| "opened".to_string());
                client.list_merge_requests(&project, &state).await
            }
            GitLabAction::MergeRequestChanges | GitLabAction::MergeRequestCommits => {
                let iid = match args.get("mr_iid").and_then(integer_arg) {
                    Some(iid) => iid,
                    None => return missing_argument("mr_iid"),
                };
                if action == GitLabAction::MergeRequestChanges {
                    client.merge_request_changes(&project, iid).await
                } else {
                    client.merge_request_commits(&project, iid).await
                }
            }
        };

        match result {
            Ok(data) => ToolOutcome::with_data(data),
            Err(e) => collaborator_failure("GitLab request failed", e),
        }
    }
}

/// A string argument; numbers are accepted and rendered without decoration
fn string_arg(args: &Map<String, Value>, name: &str) -> Option<String> {
    match args.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integer_arg(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().trim_start_matches('!').parse().ok(),
        _ => None,
    }
}

fn missing_argument(name: &str) -> ToolOutcome {
    ToolOutcome::failure_with_error("Missing argument", format!("Missing required argument: {}", name))
}

fn collaborator_failure(context: &str, error: CollaboratorError) -> ToolOutcome {
    ToolOutcome::failure_with_error(error.to_string(), format!("{}: {}", context, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records every remote call in order
    #[derive(Default)]
    struct RecordingRemote {
        calls: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl RemoteTools for RecordingRemote {
        async fn call_tool(&self, key: &str, arguments: Value) -> ToolOutcome {
            self.calls.lock().push((key.to_string(), arguments));
            ToolOutcome::ok(format!("{} done", key))
        }
    }

    fn dispatcher() -> (Dispatcher, Arc<RecordingRemote>) {
        let remote = Arc::new(RecordingRemote::default());
        (Dispatcher::new(remote.clone(), Arc::new(NoOpLogger)), remote)
    }

    #[tokio::test]
    async fn test_unknown_function() {
        let (dispatcher, remote) = dispatcher();
        let outcome = dispatcher.dispatch("launchRocket", json!({})).await;

        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Unknown function: launchRocket"));
        assert!(remote.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_create_issue_defaults_and_project() {
        let (dispatcher, remote) = dispatcher();
        let dispatcher = dispatcher.with_default_project("42");

        let outcome = dispatcher
            .dispatch("createRedmineIssue", json!({"subject": "Login fails"}))
            .await;
        assert!(outcome.success);

        let calls = remote.calls.lock();
        assert_eq!(calls[0].0, "redmine_create_issue");
        assert_eq!(
            calls[0].1,
            json!({"subject": "Login fails", "priority_id": 4, "tracker_id": 2, "project_id": "42"})
        );
    }

    #[tokio::test]
    async fn test_model_values_win_over_defaults() {
        let (dispatcher, remote) = dispatcher();
        dispatcher
            .dispatch("listMyRedmineTasks", json!({"status_filter": "closed", "project_id": "7"}))
            .await;

        let calls = remote.calls.lock();
        assert_eq!(calls[0].0, "redmine_list_my_tasks");
        assert_eq!(
            calls[0].1,
            json!({"status_filter": "closed", "project_id": "7", "assigned_to_id": "me"})
        );
    }

    #[tokio::test]
    async fn test_malformed_arguments_fail_the_call_only() {
        let (dispatcher, remote) = dispatcher();
        let call = ToolCallRequest::new("call_1", "addRedmineNote", "{\"issue_id\": 3,");

        let outcome = dispatcher.dispatch_call(&call).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Invalid arguments"));
        assert!(remote.calls.lock().is_empty());

        let outcome = dispatcher.dispatch("addRedmineNote", json!([1, 2])).await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_local_light_needs_no_network() {
        let (dispatcher, remote) = dispatcher();
        let call = ToolCallRequest::new("call_1", "controlLight", r#"{"action":"on","brightness":60}"#);

        let outcome = dispatcher.dispatch_call(&call).await;
        assert!(outcome.success);
        assert_eq!(outcome.extra["state"]["brightness"], json!(60));
        assert!(remote.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_collaborators() {
        let (dispatcher, _) = dispatcher();

        let outcome = dispatcher.dispatch("getRedmineIssues", json!({})).await;
        assert!(!outcome.success);
        assert!(outcome.message.unwrap().contains("not configured"));

        let outcome = dispatcher
            .dispatch("listGitLabMergeRequests", json!({"project_id": 12}))
            .await;
        assert!(!outcome.success);
        assert!(outcome.message.unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_gitlab_missing_arguments() {
        let (dispatcher, _) = dispatcher();
        let dispatcher = dispatcher.with_gitlab(GitLabClient::new(reqwest::Client::new(), "http://127.0.0.1:9", "t"));

        let outcome = dispatcher.dispatch("getGitLabMRChanges", json!({"project_id": 12})).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Missing required argument: mr_iid"));

        let outcome = dispatcher.dispatch("getGitLabMRCommits", json!({"mr_iid": 3})).await;
        assert_eq!(outcome.message.as_deref(), Some("Missing required argument: project_id"));
    }

    #[test]
    fn test_tool_names_enumerable() {
        let names = Dispatcher::tool_names();
        assert_eq!(names.len(), 17);
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(matches!(Dispatcher::handler("controlLight"), Some(Handler::Local(_))));
        assert!(Dispatcher::handler("google_search").is_none());
    }

    #[test]
    fn test_argument_helpers() {
        let args = json!({"a": " x ", "b": 12, "c": "", "d": true}).as_object().cloned().unwrap();
        assert_eq!(string_arg(&args, "a").as_deref(), Some("x"));
        assert_eq!(string_arg(&args, "b").as_deref(), Some("12"));
        assert_eq!(string_arg(&args, "c"), None);
        assert_eq!(string_arg(&args, "d"), None);

        assert_eq!(integer_arg(&json!(5)), Some(5));
        assert_eq!(integer_arg(&json!(5.0)), Some(5));
        assert_eq!(integer_arg(&json!("!17")), Some(17));
        assert_eq!(integer_arg(&json!(-1)), None);
    }
}
