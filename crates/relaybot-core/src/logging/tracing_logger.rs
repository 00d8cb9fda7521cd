//! Logger backed by the `tracing` crate

use super::traits::Logger;

/// Forwards every message to `tracing` under a fixed component name
///
/// The host decides where records go by installing a subscriber, e.g.
/// `tracing_subscriber::fmt().with_env_filter(..)` in the CLI.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: &'static str,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLogger {
    pub fn new() -> Self {
        Self { component: "relaybot" }
    }

    /// Tag records with a different component name
    pub fn with_component(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(component = self.component, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(component = self.component, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(component = self.component, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(component = self.component, "{}", message);
    }
}
