//! Static routing table: function name -> handler

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

/// Actions handled in-process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalAction {
    ControlLight,
}

/// Direct Redmine REST calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedmineAction {
    ListIssues,
}

/// Direct GitLab REST calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitLabAction {
    ListMergeRequests,
    MergeRequestChanges,
    MergeRequestCommits,
}

/// Value injected when the model leaves an argument out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultArg {
    Str(&'static str),
    Int(i64),
}

impl DefaultArg {
    pub fn to_value(self) -> Value {
        match self {
            DefaultArg::Str(s) => Value::from(s),
            DefaultArg::Int(n) => Value::from(n),
        }
    }
}

/// Delegation to a remote tool server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteRoute {
    /// Composite key `"{server}_{tool}"`
    pub key: &'static str,
    pub defaults: &'static [(&'static str, DefaultArg)],
    /// Fill `project_id` from the configured default project
    pub project_scoped: bool,
}

impl RemoteRoute {
    fn new(key: &'static str) -> Self {
        Self {
            key,
            defaults: &[],
            project_scoped: false,
        }
    }

    fn with_defaults(mut self, defaults: &'static [(&'static str, DefaultArg)]) -> Self {
        self.defaults = defaults;
        self
    }

    fn project_scoped(mut self) -> Self {
        self.project_scoped = true;
        self
    }
}

/// Where a function call goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Local(LocalAction),
    Redmine(RedmineAction),
    GitLab(GitLabAction),
    Remote(RemoteRoute),
}

const CREATE_ISSUE_DEFAULTS: &[(&str, DefaultArg)] = &[
    ("priority_id", DefaultArg::Int(4)),
    ("tracker_id", DefaultArg::Int(2)),
];

const MY_TASKS_DEFAULTS: &[(&str, DefaultArg)] = &[
    ("status_filter", DefaultArg::Str("open")),
    ("assigned_to_id", DefaultArg::Str("me")),
];

pub(crate) static HANDLERS: Lazy<HashMap<&'static str, Handler>> = Lazy::new(|| {
    use Handler::{GitLab, Local, Redmine, Remote};

    HashMap::from([
        ("controlLight", Local(LocalAction::ControlLight)),
        ("getRedmineIssues", Redmine(RedmineAction::ListIssues)),
        (
            "createRedmineIssue",
            Remote(
                RemoteRoute::new("redmine_create_issue")
                    .with_defaults(CREATE_ISSUE_DEFAULTS)
                    .project_scoped(),
            ),
        ),
        ("assignRedmineIssue", Remote(RemoteRoute::new("redmine_update_issue"))),
        (
            "listMyRedmineTasks",
            Remote(
                RemoteRoute::new("redmine_list_my_tasks")
                    .with_defaults(MY_TASKS_DEFAULTS)
                    .project_scoped(),
            ),
        ),
        ("getRedmineIssueDetails", Remote(RemoteRoute::new("redmine_get_issue_details"))),
        ("logRedmineTime", Remote(RemoteRoute::new("redmine_log_time"))),
        ("updateRedmineIssueStatus", Remote(RemoteRoute::new("redmine_update_issue_status"))),
        ("updateRedmineProgress", Remote(RemoteRoute::new("redmine_update_progress"))),
        ("addRedmineNote", Remote(RemoteRoute::new("redmine_add_note"))),
        ("getTodayRedmineLogs", Remote(RemoteRoute::new("redmine_get_today_logs"))),
        ("getRedmineLogsRange", Remote(RemoteRoute::new("redmine_get_time_logs_range"))),
        ("listRedmineStatuses", Remote(RemoteRoute::new("redmine_list_statuses"))),
        ("getRedmineUserInfo", Remote(RemoteRoute::new("redmine_get_user_info"))),
        ("listGitLabMergeRequests", GitLab(GitLabAction::ListMergeRequests)),
        ("getGitLabMRChanges", GitLab(GitLabAction::MergeRequestChanges)),
        ("getGitLabMRCommits", GitLab(GitLabAction::MergeRequestCommits)),
    ])
});

/// Insert `defaults` for every key that is absent or null
pub(crate) fn apply_defaults(args: &mut Map<String, Value>, defaults: &[(&str, DefaultArg)]) {
    for (name, default) in defaults {
        let missing = args.get(*name).map_or(true, Value::is_null);
        if missing {
            args.insert((*name).to_string(), default.to_value());
        }
    }
}
