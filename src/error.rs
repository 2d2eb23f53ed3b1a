use crate::api::validation::Violations;
use rmcp::ErrorData as McpError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TldvError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] Violations),

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status. Displays only the server-provided message.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("MCP protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TldvError>;

impl TldvError {
    /// Network failures, 5xx and 429 are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            TldvError::Network(_) => true,
            TldvError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Convert error to an MCP error returned to the host
    pub fn into_mcp_error(self) -> McpError {
        match self {
            TldvError::Validation(violations) => {
                McpError::invalid_params(format!("Invalid arguments: {}", violations), None)
            }
            other => McpError::internal_error(other.to_string(), None),
        }
    }
}
