//! Tool dispatch
//!
//! A static table maps every function name the model may call to exactly one
//! handler kind: a local action, a direct REST collaborator call, or the
//! remote tool bridge under a composite key.

mod dispatcher;
mod handlers;
mod local;

pub use dispatcher::Dispatcher;
pub use handlers::{DefaultArg, GitLabAction, Handler, LocalAction, RedmineAction, RemoteRoute};
pub use local::control_light;
