//! Static tool definitions advertised to the model

use once_cell::sync::Lazy;

use crate::types::{PropertySchema, ToolDefinition, ToolSpec};

/// Provider built-in web search
pub const GOOGLE_SEARCH: &str = "google_search";

static GENERAL_TOOLS: Lazy<Vec<ToolSpec>> = Lazy::new(|| {
    let mut tools = vec![ToolSpec::builtin(GOOGLE_SEARCH), ToolSpec::function(control_light())];
    tools.extend(redmine_tools().into_iter().map(ToolSpec::function));
    tools
});

static CODE_REVIEW_TOOLS: Lazy<Vec<ToolSpec>> = Lazy::new(|| {
    let mut tools = vec![ToolSpec::builtin(GOOGLE_SEARCH)];
    tools.extend(gitlab_tools().into_iter().map(ToolSpec::function));
    tools
});

/// Tools offered in general assistant mode
pub fn general_tools() -> &'static [ToolSpec] {
    &GENERAL_TOOLS
}

/// Tools offered in code-review mode
pub fn code_review_tools() -> &'static [ToolSpec] {
    &CODE_REVIEW_TOOLS
}

fn issue_id() -> PropertySchema {
    PropertySchema::integer("Redmine issue ID")
}

fn control_light() -> ToolDefinition {
    ToolDefinition::new(
        "controlLight",
        "Control the smart light: switch it on or off and set its brightness",
    )
    .required(
        "action",
        PropertySchema::string("Turn the light on or off").with_enum(["on", "off"]),
    )
    .param(
        "brightness",
        PropertySchema::number("Brightness from 0 to 100, only used when action is \"on\""),
    )
}

fn redmine_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("createRedmineIssue", "Create a new task or issue in Redmine")
            .param("project_id", PropertySchema::string("Project ID or identifier; the current project if omitted"))
            .required("subject", PropertySchema::string("Issue title"))
            .param("description", PropertySchema::string("Detailed description"))
            .param(
                "priority_id",
                PropertySchema::integer("Priority: 3=Low, 4=Normal (default), 5=High, 6=Urgent, 7=Immediate")
                    .with_enum([3, 4, 5, 6, 7]),
            )
            .param(
                "tracker_id",
                PropertySchema::integer("Tracker: 1=Bug, 2=Feature (default), 3=Support").with_enum([1, 2, 3]),
            )
            .param("assigned_to_id", PropertySchema::integer("User ID of the assignee"))
            .param("estimated_hours", PropertySchema::number("Estimated hours to complete"))
            .param("start_date", PropertySchema::string("Start date, YYYY-MM-DD"))
            .param("due_date", PropertySchema::string("Due date, YYYY-MM-DD"))
            .param("parent_issue_id", PropertySchema::integer("Parent issue ID")),
        ToolDefinition::new("assignRedmineIssue", "Assign an existing Redmine issue to a member")
            .required("issue_id", issue_id())
            .required("assigned_to_id", PropertySchema::integer("User ID of the new assignee")),
        ToolDefinition::new("getRedmineIssues", "List tasks/issues of the Redmine project")
            .param(
                "status",
                PropertySchema::string("open, closed or * for all. Default: open").with_enum(["open", "closed", "*"]),
            )
            .param(
                "assigned_to_id",
                PropertySchema::string("Filter by assignee: a user ID or \"me\""),
            )
            .param("limit", PropertySchema::integer("Number of issues to return (default 10, max 100)"))
            .param(
                "sort",
                PropertySchema::string("Sort order").with_enum([
                    "updated_on:desc",
                    "updated_on:asc",
                    "priority:desc",
                    "priority:asc",
                    "status:asc",
                    "status:desc",
                ]),
            ),
        ToolDefinition::new("listMyRedmineTasks", "List tasks assigned to the current user")
            .param("project_id", PropertySchema::string("Project ID or identifier"))
            .param(
                "status_filter",
                PropertySchema::string("open, closed or all. Default: open").with_enum(["open", "closed", "all"]),
            )
            .param("assigned_to_id", PropertySchema::string("User ID, or \"me\" (default)")),
        ToolDefinition::new("getRedmineIssueDetails", "Show the full details of one Redmine issue")
            .required("issue_id", issue_id()),
        ToolDefinition::new("logRedmineTime", "Log spent time on a Redmine issue")
            .required("issue_id", issue_id())
            .required("hours", PropertySchema::number("Hours spent"))
            .param("comment", PropertySchema::string("What was done"))
            .param("activity_id", PropertySchema::integer("Time entry activity ID"))
            .param("process", PropertySchema::string("Process or phase name"))
            .param("spent_on", PropertySchema::string("Date, YYYY-MM-DD; today if omitted")),
        ToolDefinition::new("updateRedmineIssueStatus", "Change the status of a Redmine issue")
            .required("issue_id", issue_id())
            .required("status_id", PropertySchema::integer("Target status ID, see listRedmineStatuses")),
        ToolDefinition::new("updateRedmineProgress", "Set the done ratio of a Redmine issue")
            .required("issue_id", issue_id())
            .required("percent", PropertySchema::integer("Progress from 0 to 100")),
        ToolDefinition::new("addRedmineNote", "Add a note/comment to a Redmine issue")
            .required("issue_id", issue_id())
            .required("note", PropertySchema::string("Note text")),
        ToolDefinition::new("getTodayRedmineLogs", "Show the time entries logged today"),
        ToolDefinition::new("getRedmineLogsRange", "Show time entries between two dates")
            .required("from_date", PropertySchema::string("Start date, YYYY-MM-DD"))
            .required("to_date", PropertySchema::string("End date, YYYY-MM-DD")),
        ToolDefinition::new("listRedmineStatuses", "List the issue statuses available in Redmine"),
        ToolDefinition::new("getRedmineUserInfo", "Look up a Redmine user by name")
            .required("username", PropertySchema::string("Login or display name")),
    ]
}

fn gitlab_tools() -> Vec<ToolDefinition> {
    let project = || PropertySchema::string("GitLab project ID (e.g. 12345) or path (e.g. group/app)");
    let mr_iid = || PropertySchema::integer("Merge request IID (project-internal ID)");

    vec![
        ToolDefinition::new(
            "listGitLabMergeRequests",
            "List merge requests of a GitLab project with title, author and status",
        )
        .required("project_id", project())
        .param(
            "state",
            PropertySchema::string("opened (default), closed, merged or all")
                .with_enum(["opened", "closed", "merged", "all"]),
        ),
        ToolDefinition::new("getGitLabMRChanges", "Get the diff of one merge request")
            .required("project_id", project())
            .required("mr_iid", mr_iid()),
        ToolDefinition::new("getGitLabMRCommits", "List the commits of one merge request")
            .required("project_id", project())
            .required("mr_iid", mr_iid()),
    ]
}
