//! Wiring from settings to a ready conversation driver

use std::sync::Arc;

use thiserror::Error;

use crate::bridge::McpBridge;
use crate::collaborators::{GitLabClient, RedmineClient};
use crate::config::{AppSettings, ConfigError, FileServerConfig};
use crate::conversation::{ConversationDriver, FallbackMessages};
use crate::dispatch::Dispatcher;
use crate::logging::{Logger, SharedLogger};
use crate::providers::{create_backend, ProviderError};
use crate::resolver::EnvLookup;
use crate::secrets::SecretStore;
use crate::{log_debug, log_info};

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Provider(#[from] ProviderError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type SetupResult<T> = Result<T, SetupError>;

/// Shared HTTP client; every outbound call inherits its timeout
pub fn http_client(settings: &AppSettings) -> SetupResult<reqwest::Client> {
    let timeout = settings.request_timeout()?;
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("relaybot/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Remote tool bridge over the configured server file
pub fn build_bridge(
    settings: &AppSettings,
    env: Arc<dyn EnvLookup>,
    http: reqwest::Client,
    logger: SharedLogger,
) -> McpBridge {
    let source = Arc::new(FileServerConfig::new(settings.mcp.config_path.clone()));
    McpBridge::new(source, env, http, logger)
}

/// Dispatcher with whichever REST collaborators have credentials
pub fn build_dispatcher(
    settings: &AppSettings,
    secrets: &dyn SecretStore,
    env: Arc<dyn EnvLookup>,
    http: reqwest::Client,
    logger: SharedLogger,
) -> Dispatcher {
    let bridge = build_bridge(settings, env, http.clone(), logger.clone());
    let mut dispatcher = Dispatcher::new(Arc::new(bridge), logger.clone());

    if let (Some(url), Some(key)) = (settings.redmine.url.as_deref(), secrets.get("redmine")) {
        let mut client = RedmineClient::new(http.clone(), url, key).with_logger(logger.clone());
        if let Some(project) = &settings.redmine.default_project_id {
            client = client.with_default_project(project.clone());
        }
        dispatcher = dispatcher.with_redmine(client);
    } else {
        log_debug!(logger, "[Setup] Redmine REST disabled (url or API key missing)");
    }

    if let Some(token) = secrets.get("gitlab") {
        let client = GitLabClient::new(http, settings.gitlab.url.as_str(), token).with_logger(logger.clone());
        dispatcher = dispatcher.with_gitlab(client);
    } else {
        log_debug!(logger, "[Setup] GitLab REST disabled (no token)");
    }

    if let Some(project) = &settings.redmine.default_project_id {
        dispatcher = dispatcher.with_default_project(project.clone());
    }
    dispatcher
}

/// Build a conversation driver from validated settings
pub fn build_driver(
    settings: &AppSettings,
    secrets: &dyn SecretStore,
    env: Arc<dyn EnvLookup>,
    logger: SharedLogger,
) -> SetupResult<ConversationDriver> {
    settings.validate()?;
    let http = http_client(settings)?;

    let backend = create_backend(&settings.llm, secrets.get("llm"), http.clone(), logger.clone())?;
    let dispatcher = build_dispatcher(settings, secrets, env, http, logger.clone());

    log_info!(
        logger,
        "[Setup] Driver ready: backend={} model={} servers={}",
        backend.name(),
        settings.llm.model,
        settings.mcp.config_path.display()
    );

    Ok(ConversationDriver::new(backend, dispatcher, logger)
        .with_max_iterations(settings.conversation.max_iterations)
        .with_utc_offset_minutes(settings.conversation.utc_offset_minutes)
        .with_fallbacks(FallbackMessages::for_language(settings.conversation.language)))
}
