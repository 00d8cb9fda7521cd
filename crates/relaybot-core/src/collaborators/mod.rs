//! REST collaborators: Redmine issues and GitLab merge requests
//!
//! Only the calls the dispatcher routes to directly are implemented here.
//! Everything else on the issue tracker goes through the remote tool bridge.

mod error;
mod gitlab;
mod redmine;

pub use error::{CollaboratorError, CollaboratorResult};
pub use gitlab::GitLabClient;
pub use redmine::{IssueList, IssueQuery, IssueSummary, RedmineClient};
