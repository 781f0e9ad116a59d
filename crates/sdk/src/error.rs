//! Error types for the Tell client
//!
//! The SDK never panics and never surfaces errors through ingest return
//! values; everything after construction flows through the configured
//! error callback.

use std::sync::Arc;

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, TellError>;

/// Callback invoked with every dropped-record or transport error.
///
/// Validation errors arrive on the calling thread; network and
/// serialization errors arrive on a worker-owned thread. The callback runs
/// synchronously and must not block.
pub type ErrorCallback = Arc<dyn Fn(&TellError) + Send + Sync>;

/// Coarse error classification, for callback-side dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration at construction
    Configuration,
    /// Bad producer input (record dropped)
    Validation,
    /// Transport failure (batch retried or dropped)
    Network,
    /// Encoding failure (record dropped)
    Serialization,
    /// Client already closed
    Closed,
    /// Low-level system error
    Io,
}

/// Errors produced by the Tell client
#[derive(Debug, Error)]
pub enum TellError {
    /// Bad api key or endpoint, raised synchronously at construction
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed producer input; the record was dropped
    #[error("validation error: {field} {reason}")]
    Validation {
        /// Input that failed validation (e.g. "userId")
        field: &'static str,
        /// Why it failed (e.g. "is required")
        reason: &'static str,
    },

    /// Connect, send, or retry-exhaustion failure
    #[error("network error: {0}")]
    Network(String),

    /// Impossible encoding (e.g. oversize field); the record was dropped
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Operation after close
    #[error("client is closed")]
    Closed,

    /// Low-level system error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TellError {
    /// The coarse kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Network(_) => ErrorKind::Network,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Closed => ErrorKind::Closed,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn validation(field: &'static str, reason: &'static str) -> Self {
        Self::Validation { field, reason }
    }

    pub(crate) fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TellError::configuration("apiKey must be 32 hex characters, got 3");
        assert_eq!(
            err.to_string(),
            "configuration error: apiKey must be 32 hex characters, got 3"
        );

        let err = TellError::validation("userId", "is required");
        assert_eq!(err.to_string(), "validation error: userId is required");

        let err = TellError::network("connect failed to localhost:50000");
        assert_eq!(err.to_string(), "network error: connect failed to localhost:50000");

        assert_eq!(TellError::Closed.to_string(), "client is closed");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            TellError::validation("userId", "is required").kind(),
            ErrorKind::Validation
        );
        assert_eq!(TellError::network("x").kind(), ErrorKind::Network);
        assert_eq!(TellError::Closed.kind(), ErrorKind::Closed);
    }
}
