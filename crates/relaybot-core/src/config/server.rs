//! Remote tool server configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resolver::{substitute, substitute_str, EnvLookup};

/// Hosted endpoint used when no server configuration can be read
pub const DEFAULT_SERVER_URL: &str = "https://redmine-mcp-server.vercel.app/api/mcp";

/// Identifier of the fallback server
pub const DEFAULT_SERVER_ID: &str = "redmine";

/// One remote tool server
///
/// `params` become query parameters of the endpoint URL and may contain
/// `${VAR}` placeholders until [`ServerConfig::resolve`] is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ServerConfig {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter, keeping insertion order
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Substitute `${VAR}` placeholders in the URL and every parameter
    pub fn resolve(&self, env: &dyn EnvLookup) -> Self {
        Self {
            id: self.id.clone(),
            url: substitute_str(&self.url, env),
            params: self
                .params
                .iter()
                .map(|(k, v)| (k.clone(), substitute(v, env)))
                .collect(),
        }
    }

    /// The single server used when configuration is unavailable
    ///
    /// Its credentials come from `REDMINE_URL` and `REDMINE_API_KEY`.
    pub fn fallback() -> Self {
        Self::new(DEFAULT_SERVER_ID, DEFAULT_SERVER_URL)
            .with_param("redmine_url", "${REDMINE_URL}")
            .with_param("api_key", "${REDMINE_API_KEY}")
    }
}
