//! Service-level orchestration errors.

use crate::orchestration::{
    domain::{BackendKind, OrchestrationDomainError},
    ports::BackendPortError,
};
use thiserror::Error;

/// Errors that fail an orchestrated initialisation.
#[derive(Debug, Clone, Error)]
pub enum OrchestrationError {
    /// A backend client or connection could not be established.
    #[error("{backend} backend failed to connect: {source}")]
    Connect {
        /// Backend that failed.
        backend: BackendKind,
        /// Adapter failure.
        source: BackendPortError,
    },

    /// A backend refused the configured credentials.
    #[error("{backend} backend failed to authenticate: {source}")]
    Authenticate {
        /// Backend that failed.
        backend: BackendKind,
        /// Adapter failure.
        source: BackendPortError,
    },

    /// A sync-SQL model factory failed.
    #[error("model '{model}' could not be realised: {source}")]
    Realize {
        /// Export name of the model.
        model: String,
        /// Factory failure.
        source: OrchestrationDomainError,
    },

    /// Schema synchronisation failed for a sync-SQL model.
    #[error("model '{model}' failed to synchronise: {source}")]
    Sync {
        /// Export name of the model.
        model: String,
        /// Adapter failure.
        source: BackendPortError,
    },

    /// Connection options were rejected before any connection attempt.
    #[error("{backend} backend options are invalid: {reason}")]
    InvalidOptions {
        /// Backend whose options were rejected.
        backend: BackendKind,
        /// Rejection reason.
        reason: String,
    },

    /// The document store initialised without connections or collections.
    #[error(
        "document store initialised with {connections} connection(s) and \
         {collections} collection(s)"
    )]
    StructuralMismatch {
        /// Number of live connections reported.
        connections: usize,
        /// Number of live collections reported.
        collections: usize,
    },
}

impl OrchestrationError {
    /// Returns the backend the error originated from.
    #[must_use]
    pub const fn backend(&self) -> BackendKind {
        match self {
            Self::Connect { backend, .. }
            | Self::Authenticate { backend, .. }
            | Self::InvalidOptions { backend, .. } => *backend,
            Self::Realize { .. } | Self::Sync { .. } => BackendKind::SyncSql,
            Self::StructuralMismatch { .. } => BackendKind::Document,
        }
    }

    pub(crate) const fn connect(backend: BackendKind, source: BackendPortError) -> Self {
        Self::Connect { backend, source }
    }
}

/// Result type for orchestration service operations.
pub type OrchestrationResult<T> = Result<T, OrchestrationError>;
