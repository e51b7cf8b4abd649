//! Unified error types for milesfare.
//!
//! Each variant carries a stable prefix so callers of the MCP surface can
//! match on the code without parsing the message.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::airports::AirportError;
use crate::config::ConfigError;

/// Unified error types for the flight search server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., malformed airport code).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Airport code is well formed but not present in the directory.
    #[error("UNKNOWN_AIRPORT: {0}")]
    UnknownAirport(String),

    /// Configuration could not be loaded or is incomplete.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    /// Airport reference data could not be loaded.
    #[error("AIRPORTS_ERROR: {0}")]
    Airports(#[from] AirportError),

    /// Upstream client could not be constructed.
    #[error("UPSTREAM_ERROR: {0}")]
    Upstream(String),

    /// The search could not be orchestrated (e.g., date out of range).
    #[error("SEARCH_FAILED: {0}")]
    SearchFailed(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::UnknownAirport(code) => (-32602, format!("unknown airport: {code}")),
            Error::Config(e) => (-32001, e.to_string()),
            Error::Airports(e) => (-32002, e.to_string()),
            Error::Upstream(msg) => (-32003, msg.clone()),
            Error::SearchFailed(msg) => (-32000, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
