//! Application settings (YAML)
//!
//! Supports user-level (`~/.config/relaybot/config.yaml`) and workspace-level
//! (`.config/relaybot/config.yaml`) files. Environment variables override
//! whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::file::DEFAULT_SERVERS_FILE;
use super::traits::{ConfigError, ConfigResult};
use crate::resolver::EnvLookup;

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://cliproxyapi-5aib.onrender.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Which chat backend to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// OpenAI-compatible chat-completions endpoint
    #[default]
    OpenAi,
    /// Scripted in-process backend
    Mock,
}

impl std::str::FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "mock" => Ok(Self::Mock),
            other => Err(ConfigError::Invalid(format!("unknown backend '{}'", other))),
        }
    }
}

/// Language of the fixed user-facing fallback replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackLanguage {
    #[default]
    En,
    Vi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub endpoint: String,
    pub model: String,
    pub backend: BackendKind,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            backend: BackendKind::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationSettings {
    /// Upper bound on model calls per turn
    pub max_iterations: usize,
    /// Offset of the local clock shown to the model, in minutes east of UTC
    pub utc_offset_minutes: i32,
    /// Per-request timeout for every outbound call, e.g. `30s` or `1m 30s`
    pub request_timeout: String,
    pub language: FallbackLanguage,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            utc_offset_minutes: 420,
            request_timeout: "30s".to_string(),
            language: FallbackLanguage::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedmineSettings {
    pub url: Option<String>,
    pub default_project_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitLabSettings {
    pub url: String,
}

impl Default for GitLabSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_GITLAB_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpSettings {
    /// Path of the tool-server file
    pub config_path: PathBuf,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_SERVERS_FILE),
        }
    }
}

/// Everything the CLI and `build_driver` need to wire a conversation driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub llm: LlmSettings,
    pub conversation: ConversationSettings,
    pub redmine: RedmineSettings,
    pub gitlab: GitLabSettings,
    pub mcp: McpSettings,
}

impl AppSettings {
    /// Apply `AI_MODEL`, `AI_ENDPOINT`, `REDMINE_URL`, `REDMINE_DEFAULT_PROJECT_ID`,
    /// `GITLAB_URL` and `MCP_CONFIG`; empty values are ignored
    pub fn apply_env(&mut self, env: &dyn EnvLookup) {
        let get = |name: &str| env.var(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = get("AI_MODEL") {
            self.llm.model = model;
        }
        if let Some(endpoint) = get("AI_ENDPOINT") {
            self.llm.endpoint = endpoint;
        }
        if let Some(url) = get("REDMINE_URL") {
            self.redmine.url = Some(url);
        }
        if let Some(project) = get("REDMINE_DEFAULT_PROJECT_ID") {
            self.redmine.default_project_id = Some(project);
        }
        if let Some(url) = get("GITLAB_URL") {
            self.gitlab.url = url;
        }
        if let Some(path) = get("MCP_CONFIG") {
            self.mcp.config_path = PathBuf::from(path);
        }
    }

    /// Parsed `conversation.request_timeout`
    pub fn request_timeout(&self) -> ConfigResult<Duration> {
        humantime::parse_duration(self.conversation.request_timeout.trim()).map_err(|e| {
            ConfigError::Invalid(format!(
                "request_timeout '{}': {}",
                self.conversation.request_timeout, e
            ))
        })
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        if self.conversation.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be at least 1".into()));
        }
        if !(-720..=840).contains(&self.conversation.utc_offset_minutes) {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_minutes {} is out of range",
                self.conversation.utc_offset_minutes
            )));
        }
        self.request_timeout()?;
        Ok(())
    }
}

/// Settings file level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsLevel {
    /// `~/.config/relaybot/config.yaml`
    User,
    /// `.config/relaybot/config.yaml` under a workspace root
    Workspace,
}

impl SettingsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsLevel::User => "user",
            SettingsLevel::Workspace => "workspace",
        }
    }
}

/// A settings file on disk
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
    level: SettingsLevel,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>, level: SettingsLevel) -> Self {
        Self {
            path: path.into(),
            level,
        }
    }

    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("relaybot").join("config.yaml"), SettingsLevel::User)
    }

    pub fn workspace(root: impl AsRef<Path>) -> Self {
        let path = root.as_ref().join(".config").join("relaybot").join("config.yaml");
        Self::new(path, SettingsLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> SettingsLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the file; a missing file yields defaults
    pub fn load(&self) -> ConfigResult<AppSettings> {
        if !self.path.exists() {
            return Ok(AppSettings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppSettings::default());
        }
        let settings: AppSettings = serde_yaml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings, creating parent directories
    pub fn save(&self, settings: &AppSettings) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml::to_string(settings)?)?;
        Ok(())
    }
}
