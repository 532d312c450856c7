use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used throughout the adapter layer.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Failures a completion call can surface. None of these are recovered
/// inside the adapter; the orchestrator that issued the reasoning step
/// decides what to do with them.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Caller contract violation detected before any network I/O,
    /// e.g. a non-empty stop-sequence list on a backend that forbids one.
    #[error("usage error: {0}")]
    Usage(String),

    /// The request never completed: connection refused, DNS failure,
    /// or the client-side timeout fired.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-200 status. The body is kept
    /// verbatim as diagnostic text.
    #[error("remote endpoint returned {status}: {body}")]
    Remote { status: StatusCode, body: String },

    /// The endpoint answered 200 but the body was not the expected shape.
    #[error("failed to parse endpoint response: {0}")]
    Parse(String),
}

impl AdapterError {
    /// Status code of a `Remote` failure, if that is what this is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AdapterError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
