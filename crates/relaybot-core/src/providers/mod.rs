//! Chat backends
//!
//! The conversation driver talks to a `ChatBackend`:
//! - `OpenAiCompatBackend`: any chat-completions endpoint (bearer token)
//! - `MockBackend`: scripted, records requests; used by tests and `--backend mock`

mod error;
mod mock;
mod openai_compat;
mod traits;

pub use error::{ProviderError, ProviderResult};
pub use mock::{MockBackend, MockMode, MockStep, RecordedRequest};
pub use openai_compat::OpenAiCompatBackend;
pub use traits::{AssistantReply, ChatBackend, CompletionRequest};

use std::sync::Arc;

use crate::config::{BackendKind, LlmSettings};
use crate::logging::SharedLogger;

/// Create the backend selected in the settings
///
/// `api_key` is only required by the OpenAI-compatible backend.
pub fn create_backend(
    settings: &LlmSettings,
    api_key: Option<String>,
    http: reqwest::Client,
    logger: SharedLogger,
) -> ProviderResult<Arc<dyn ChatBackend>> {
    match settings.backend {
        BackendKind::Mock => Ok(Arc::new(MockBackend::echo(logger))),
        BackendKind::OpenAi => {
            let api_key = api_key.ok_or_else(|| ProviderError::missing_api_key("openai"))?;
            Ok(Arc::new(OpenAiCompatBackend::new(
                http,
                settings.endpoint.clone(),
                api_key,
                logger,
            )?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_create_backend() {
        let mut settings = LlmSettings::default();
        let logger: SharedLogger = Arc::new(NoOpLogger);

        let err = create_backend(&settings, None, reqwest::Client::new(), logger.clone()).err();
        assert!(matches!(err, Some(ProviderError::MissingApiKey { .. })));

        let backend = create_backend(&settings, Some("k".into()), reqwest::Client::new(), logger.clone()).unwrap();
        assert_eq!(backend.name(), "openai");

        settings.backend = BackendKind::Mock;
        let backend = create_backend(&settings, None, reqwest::Client::new(), logger).unwrap();
        assert_eq!(backend.name(), "mock");
    }
}
