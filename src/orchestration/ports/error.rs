//! Error type shared by every backend port.

use std::sync::Arc;
use thiserror::Error;

/// Result type for backend port operations.
pub type BackendPortResult<T> = Result<T, BackendPortError>;

/// Errors returned by backend adapters.
#[derive(Debug, Clone, Error)]
pub enum BackendPortError {
    /// The backend could not be reached.
    #[error("backend at {endpoint} is unreachable: {reason}")]
    Unreachable {
        /// Endpoint that was dialled.
        endpoint: String,
        /// Adapter-provided reason.
        reason: String,
    },

    /// The backend refused the supplied credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The backend rejected a request or its options.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The connection was already closed.
    #[error("connection is closed")]
    Closed,

    /// Generic adapter failure.
    #[error("backend runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl BackendPortError {
    /// Wraps a runtime error from an adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }

    /// Creates an unreachable-endpoint error.
    pub fn unreachable(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
