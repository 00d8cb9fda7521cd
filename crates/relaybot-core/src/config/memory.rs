//! In-memory tool-server configuration

use async_trait::async_trait;
use parking_lot::RwLock;

use super::server::ServerConfig;
use super::traits::{ConfigResult, ServerConfigSource};

/// Fixed server list, useful for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryServerConfig {
    servers: RwLock<Vec<ServerConfig>>,
}

impl MemoryServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_servers(servers: Vec<ServerConfig>) -> Self {
        Self {
            servers: RwLock::new(servers),
        }
    }

    /// Replace the server list; later loads see the new list
    pub fn set_servers(&self, servers: Vec<ServerConfig>) {
        *self.servers.write() = servers;
    }
}

#[async_trait]
impl ServerConfigSource for MemoryServerConfig {
    async fn load_servers(&self) -> ConfigResult<Vec<ServerConfig>> {
        Ok(self.servers.read().clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} servers)", self.servers.read().len())
    }
}
