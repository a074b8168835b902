//! Backend kind identifiers.

use super::ParseBackendKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four persistence backends the orchestrator manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Key-value cache reached through a connect/error event race.
    Cache,
    /// Relational backend whose model factories are realised on the
    /// connection and then schema-synchronised one by one.
    SyncSql,
    /// Relational backend whose class-style entities are listed in the
    /// connection options.
    EntitySql,
    /// Document/collection store initialised once with all collections.
    Document,
}

impl BackendKind {
    /// Every backend kind, in slot order.
    pub const ALL: [Self; 4] = [Self::Cache, Self::SyncSql, Self::EntitySql, Self::Document];

    /// Returns the canonical configuration key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::SyncSql => "sync_sql",
            Self::EntitySql => "entity_sql",
            Self::Document => "document",
        }
    }

    /// Returns whether this backend owns model definitions.
    ///
    /// Caches never own models, so their skip flag does not decide whether
    /// model classification is needed.
    #[must_use]
    pub const fn owns_models(self) -> bool {
        !matches!(self, Self::Cache)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BackendKind {
    type Error = ParseBackendKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "cache" => Ok(Self::Cache),
            "sync_sql" => Ok(Self::SyncSql),
            "entity_sql" => Ok(Self::EntitySql),
            "document" => Ok(Self::Document),
            _ => Err(ParseBackendKindError(value.to_owned())),
        }
    }
}
