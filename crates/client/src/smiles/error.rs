//! Smiles API client error types.

use std::sync::Arc;

/// Errors constructing the Smiles client.
///
/// These are caller-level failures: without a client no search can run.
#[derive(Debug, thiserror::Error)]
pub enum SmilesError {
    /// Missing API key.
    #[error("missing API key: MILESFARE_API_KEY not set")]
    MissingApiKey,

    /// Missing anti-bot telemetry token.
    #[error("missing telemetry token: MILESFARE_AKAMAI_TELEMETRY not set")]
    MissingTelemetry,

    /// A configured value cannot be sent as an HTTP header.
    #[error("invalid header value for {name}")]
    InvalidHeader { name: &'static str },

    /// Base URL did not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(Arc<reqwest::Error>),
}

/// Failure of one upstream search request.
///
/// Recovered at the dispatcher boundary: a failed date contributes no flights.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Non-success HTTP status.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Body was not a JSON document.
    #[error("parse error: {0}")]
    Parse(String),

    /// The task running the request did not complete.
    #[error("search task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TransportError::Timeout } else { TransportError::Network(Arc::new(err)) }
    }
}
