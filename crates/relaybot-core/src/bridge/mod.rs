//! Dynamic tool bridge
//!
//! Remote tool servers speak JSON-RPC 2.0 over HTTP POST and may answer with
//! a bare JSON body or an event stream:
//!
//! ```text
//! McpBridge ──load──▶ ServerConfigSource (+ ${VAR} resolution)
//!     │
//!     ├─ discover ──▶ tools/list on every server (concurrently)
//!     │                 └─▶ DiscoveryReport  "{server}_{tool}" -> entry
//!     │
//!     └─ call_tool ─▶ discover again, then tools/call on the owning server
//! ```

mod client;
mod error;
mod mcp_bridge;
mod protocol;
mod registry;
mod traits;

pub use client::McpHttpClient;
pub use error::{BridgeError, BridgeResult};
pub use mcp_bridge::McpBridge;
pub use protocol::{build_url, extract_payload, RemoteTool};
pub use registry::{DiscoveryFailure, DiscoveryReport, ToolRegistryEntry};
pub use traits::RemoteTools;
