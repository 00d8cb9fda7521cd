//! Relaybot Core
//!
//! A tool-calling conversation loop for chat assistants, plus a bridge to any
//! number of remote tool servers.
//!
//! One user turn runs like this: the thread becomes history, a mode is picked
//! from the latest user message, and the model is called with that mode's
//! tool list. Requested tools are dispatched in order (locally, to a REST
//! collaborator, or through the remote bridge) and their results are fed back
//! until the model answers with text.
//!
//! ```rust,ignore
//! use relaybot_core::{build_driver, history_from_thread, AppSettings, EnvSecretStore, ProcessEnv, TurnRequest};
//!
//! let settings = AppSettings::default();
//! let driver = build_driver(&settings, &EnvSecretStore::new(), Arc::new(ProcessEnv), logger)?;
//!
//! let history = history_from_thread(&thread);
//! let reply = driver.run_turn(TurnRequest::new(history).with_project("42")).await;
//! ```

pub mod types;
pub mod logging;
pub mod secrets;
pub mod resolver;
pub mod config;
pub mod tools;
pub mod collaborators;
pub mod bridge;
pub mod providers;
pub mod dispatch;
pub mod conversation;
pub mod setup;

// Re-export commonly used types
pub use types::{ConversationMessage, Role, ToolCallRequest, ToolDefinition, ToolOutcome, ToolSpec};

pub use logging::{Logger, MemoryLogger, NoOpLogger, SharedLogger, TracingLogger};

pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore, SecretStoreError};

pub use resolver::{EnvLookup, ProcessEnv};

pub use config::{
    AppSettings, BackendKind, ConfigError, FileServerConfig, MemoryServerConfig, ServerConfig,
    ServerConfigSource, SettingsFile, SettingsLevel,
};

pub use tools::{select_mode, Mode};

pub use bridge::{DiscoveryReport, McpBridge, RemoteTools, ToolRegistryEntry};

pub use providers::{create_backend, AssistantReply, ChatBackend, MockBackend, OpenAiCompatBackend, ProviderError};

pub use dispatch::Dispatcher;

pub use conversation::{
    history_from_thread, ConversationDriver, FallbackMessages, ThreadMessage, TurnEnd, TurnReport, TurnRequest,
};

pub use setup::{build_bridge, build_dispatcher, build_driver, http_client, SetupError, SetupResult};
