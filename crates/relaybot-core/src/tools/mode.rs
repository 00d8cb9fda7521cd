//! Conversation modes: a system-prompt template paired with a tool list

use serde::{Deserialize, Serialize};

use super::catalog::{code_review_tools, general_tools};
use crate::types::{ConversationMessage, Role, ToolSpec};

/// Keyword that switches a turn into code-review mode
const REVIEW_KEYWORD: &str = "review";

const GENERAL_TEMPLATE: &str = "You are a smart and helpful assistant for a software team.

CURRENT TIME: {now}

IMPORTANT:
- Use Google Search for anything that depends on recent or real-time information
- Questions about today, now or the latest news always need a search
- Answer briefly, clearly and accurately
- If you cannot find the information, say so instead of making it up

AVAILABLE TOOLS:
- Control the smart light when asked
- Create Redmine tasks/issues when asked (\"create a task\", \"add an issue\")
  + Infer priority from keywords: urgent (6), high (5), normal (4), low (3)
  + Infer the tracker: bug (1), feature (2), support (3)
  + Take the subject and description from the request
- Assign an issue to a member right after creating it when the request names one
- List Redmine tasks (\"my tasks\", \"open tasks\"), filtered by status or assignee
  and sorted by update time, priority or status
- Show issue details, log time, update status or progress, add notes and
  report logged time";

const CODE_REVIEW_TEMPLATE: &str = "# Code Review Guidelines

You are a senior code reviewer ensuring high standards of code quality and security.
Use the GitLab tools to read the merge request, its changes and its commits before
writing anything.

## Review dimensions

1. Security (CRITICAL): hardcoded secrets, injection, XSS, missing input validation,
   path traversal, authentication or authorization bypasses
2. Code quality (HIGH): large functions, deep nesting, missing error handling,
   missing tests, unclear naming, magic numbers, duplicated code
3. Performance (MEDIUM): needless allocations, N+1 queries, blocking calls on hot paths
4. Functionality: does the change do what the merge request says

## Report

Write one comprehensive report. Group findings by severity, quote the file and line,
and give a concrete fix for each. Finish with a score out of 50
(10 per dimension plus 10 for test coverage) and a verdict:
- Recommend merge: no CRITICAL or HIGH issues
- Merge with conditions: only MEDIUM issues
- Hold: any CRITICAL or HIGH issue";

/// Operating mode of one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// General assistant with Redmine, light control and search
    #[default]
    General,
    /// Merge-request review with GitLab tools and search
    CodeReview,
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::General, Mode::CodeReview]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::General => "general",
            Mode::CodeReview => "code_review",
        }
    }

    /// Tools advertised to the model in this mode
    pub fn tools(&self) -> &'static [ToolSpec] {
        match self {
            Mode::General => general_tools(),
            Mode::CodeReview => code_review_tools(),
        }
    }

    /// Render the system prompt for the given local time
    ///
    /// The general template embeds the time inline; the review template gets
    /// it appended.
    pub fn system_prompt(&self, now: &str) -> String {
        match self {
            Mode::General => GENERAL_TEMPLATE.replace("{now}", now),
            Mode::CodeReview => format!("{}\n\nCURRENT TIME: {}", CODE_REVIEW_TEMPLATE, now),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "general" => Ok(Mode::General),
            "code_review" | "review" => Ok(Mode::CodeReview),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

/// Pick the mode from the latest user message
///
/// A case-insensitive `review` anywhere in that message selects code review.
/// Earlier messages are ignored.
pub fn select_mode(history: &[ConversationMessage]) -> Mode {
    let latest = history
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .and_then(|m| m.text())
        .unwrap_or_default();

    if latest.to_lowercase().contains(REVIEW_KEYWORD) {
        Mode::CodeReview
    } else {
        Mode::General
    }
}
