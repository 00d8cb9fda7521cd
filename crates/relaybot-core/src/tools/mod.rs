//! Tool catalog and mode selection
//!
//! Each mode pairs a system-prompt template with the tool list the model may
//! call. Schemas here are advisory; the dispatcher fills in defaults for
//! arguments the model leaves out.

mod catalog;
mod mode;

pub use catalog::{code_review_tools, general_tools, GOOGLE_SEARCH};
pub use mode::{select_mode, Mode};
