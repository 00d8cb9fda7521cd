//! Redmine and GitLab REST paths, directly and through the dispatcher

use std::sync::Arc;

use relaybot_core::bridge::RemoteTools;
use relaybot_core::collaborators::{CollaboratorError, GitLabClient, IssueQuery, RedmineClient};
use relaybot_core::dispatch::Dispatcher;
use relaybot_core::logging::NoOpLogger;
use relaybot_core::types::ToolOutcome;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct NoRemote;

#[async_trait::async_trait]
impl RemoteTools for NoRemote {
    async fn call_tool(&self, key: &str, _arguments: Value) -> ToolOutcome {
        panic!("unexpected remote call {}", key)
    }
}

fn issues_body() -> Value {
    json!({
        "issues": [
            {
                "id": 101,
                "subject": "Login fails on Safari",
                "status": {"id": 1, "name": "New"},
                "priority": {"id": 4, "name": "Normal"},
                "tracker": {"id": 1, "name": "Bug"},
                "assigned_to": {"id": 5, "name": "An Nguyen"},
                "updated_on": "2026-10-17T08:00:00Z"
            },
            {"id": 102, "subject": "Write release notes"}
        ],
        "total_count": 14,
        "offset": 0,
        "limit": 2
    })
}

#[tokio::test]
async fn test_redmine_lists_issues_with_fallback_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues.json"))
        .and(header("X-Redmine-API-Key", "rk"))
        .and(query_param("project_id", "42"))
        .and(query_param("status_id", "open"))
        .and(query_param("limit", "100"))
        .and(query_param("sort", "updated_on:desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = RedmineClient::new(reqwest::Client::new(), format!("{}/", server.uri()), "rk").with_default_project("42");
    let query = IssueQuery {
        limit: 500,
        ..IssueQuery::default()
    };
    let list = client.list_issues(&query).await.unwrap();

    assert_eq!(list.total_count, 14);
    assert_eq!(list.issues.len(), 2);
    assert_eq!(list.issues[0].assigned_to, "An Nguyen");
    assert_eq!(list.issues[0].url, format!("{}/issues/101", server.uri()));

    let bare = &list.issues[1];
    assert_eq!(
        (bare.status.as_str(), bare.priority.as_str(), bare.tracker.as_str(), bare.assigned_to.as_str()),
        ("Unknown", "Normal", "Task", "Unassigned")
    );
}

#[tokio::test]
async fn test_redmine_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let client = RedmineClient::new(reqwest::Client::new(), server.uri(), "bad");
    let query = IssueQuery {
        project_id: Some("7".into()),
        ..IssueQuery::default()
    };
    match client.list_issues(&query).await {
        Err(CollaboratorError::Api { status, body, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid key");
        }
        other => panic!("expected API error, got {:?}", other.map(|l| l.total_count)),
    }
}

#[tokio::test]
async fn test_dispatcher_lists_issues_over_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues.json"))
        .and(query_param("project_id", "9"))
        .and(query_param("assigned_to_id", "me"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues_body()))
        .expect(1)
        .mount(&server)
        .await;

    let redmine = RedmineClient::new(reqwest::Client::new(), server.uri(), "rk").with_default_project("42");
    let dispatcher = Dispatcher::new(Arc::new(NoRemote), Arc::new(NoOpLogger)).with_redmine(redmine);

    let outcome = dispatcher
        .dispatch("getRedmineIssues", json!({"project_id": 9, "assigned_to_id": "me", "limit": 5}))
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Found 2 issues (total: 14)"));
    assert_eq!(outcome.extra["total_count"], 14);
    assert_eq!(outcome.extra["issues"][0]["id"], 101);
}

#[tokio::test]
async fn test_gitlab_encodes_project_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/team%2Fbackend/merge_requests"))
        .and(header("PRIVATE-TOKEN", "gl"))
        .and(query_param("state", "opened"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"iid": 12, "title": "Add retries"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GitLabClient::new(reqwest::Client::new(), server.uri(), "gl");
    let mrs = client.list_merge_requests("team/backend", "opened").await.unwrap();
    assert_eq!(mrs[0]["iid"], 12);
}

#[tokio::test]
async fn test_dispatcher_fetches_merge_request_changes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/77/merge_requests/12/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"iid": 12, "changes": [{"new_path": "src/lib.rs"}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/77/merge_requests/13/commits"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 Not found"))
        .mount(&server)
        .await;

    let gitlab = GitLabClient::new(reqwest::Client::new(), server.uri(), "gl");
    let dispatcher = Dispatcher::new(Arc::new(NoRemote), Arc::new(NoOpLogger)).with_gitlab(gitlab);

    let outcome = dispatcher
        .dispatch("getGitLabMRChanges", json!({"project_id": 77, "mr_iid": "!12"}))
        .await;
    assert!(outcome.success);
    assert_eq!(outcome.data.unwrap()["changes"][0]["new_path"], "src/lib.rs");

    let missing = dispatcher
        .dispatch("getGitLabMRCommits", json!({"project_id": "77", "mr_iid": 13}))
        .await;
    assert!(!missing.success);
    assert!(missing.message.unwrap_or_default().contains("404"));
}
