//! Configuration
//!
//! Two concerns live here:
//! - the remote tool-server list, behind `ServerConfigSource`
//!   (`MemoryServerConfig` for tests, `FileServerConfig` for `mcp-config.json`)
//! - application settings (`AppSettings`), read from YAML and the environment

mod file;
mod memory;
mod server;
mod settings;
mod traits;

pub use file::{FileServerConfig, ServersFile, DEFAULT_SERVERS_FILE};
pub use memory::MemoryServerConfig;
pub use server::{ServerConfig, DEFAULT_SERVER_ID, DEFAULT_SERVER_URL};
pub use settings::{
    AppSettings, BackendKind, ConversationSettings, FallbackLanguage, GitLabSettings, LlmSettings,
    McpSettings, RedmineSettings, SettingsFile, SettingsLevel, DEFAULT_CHAT_ENDPOINT,
    DEFAULT_GITLAB_URL, DEFAULT_MODEL,
};
pub use traits::{ConfigError, ConfigResult, ServerConfigSource};
