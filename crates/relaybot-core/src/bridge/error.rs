//! Remote tool server error types

use thiserror::Error;

/// Errors talking to one remote tool server
///
/// None of these escape the bridge: discovery records them per server and
/// invocation turns them into a failed `ToolOutcome`.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid server URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No JSON payload in response")]
    MissingPayload,

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

pub type BridgeResult<T> = Result<T, BridgeError>;
