//! Error types for orchestration domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or realising model definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrchestrationDomainError {
    /// A model or entity name is empty after trimming.
    #[error("model name must not be empty")]
    EmptyModelName,

    /// A SQL model or entity resolved to an empty table name.
    #[error("model '{0}' has an empty table name")]
    EmptyTableName(String),

    /// An attribute or column name is empty after trimming.
    #[error("model '{model}' declares an attribute with an empty name")]
    EmptyAttributeName {
        /// Model declaring the attribute.
        model: String,
    },

    /// The same attribute or column is declared twice.
    #[error("model '{model}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute {
        /// Model declaring the attribute.
        model: String,
        /// Repeated attribute name.
        attribute: String,
    },

    /// A model references a peer model that is not part of the same backend.
    #[error("model '{model}' references unknown model '{target}'")]
    UnknownAssociation {
        /// Model declaring the association.
        model: String,
        /// Referenced model name.
        target: String,
    },

    /// A model factory refused to realise its model.
    #[error("model '{model}' could not be realised: {reason}")]
    Realize {
        /// Model being realised.
        model: String,
        /// Factory-provided reason.
        reason: String,
    },
}

/// Error returned while parsing a backend kind from configuration keys.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown backend kind: {0}")]
pub struct ParseBackendKindError(pub String);
