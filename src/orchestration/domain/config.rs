//! Backend configuration blocks.
//!
//! Every type here deserialises with `serde`; reading configuration files
//! is left to the caller.

use super::BackendKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Export name omitted from classification unless the caller overrides the
/// omit list.
pub const DEFAULT_OMITTED_MODEL: &str = "AccessToken";

/// Connection name used by the entity-SQL backend when none is configured.
pub const DEFAULT_ENTITY_CONNECTION: &str = "default";

/// Skip flag plus backend-specific options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings<T> {
    /// When true the backend is neither classified for nor initiated.
    #[serde(default)]
    pub skip: bool,
    /// Backend-specific options.
    #[serde(flatten)]
    pub options: T,
}

impl<T> BackendSettings<T> {
    /// Creates settings for a backend that should be brought up.
    #[must_use]
    pub const fn enabled(options: T) -> Self {
        Self {
            skip: false,
            options,
        }
    }
}

impl<T: Default> BackendSettings<T> {
    /// Creates settings for a backend that should be skipped.
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            skip: true,
            options: T::default(),
        }
    }
}

/// Key-value cache connection options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Optional password sent on connect.
    pub password: Option<String>,
    /// Logical database index.
    pub db: u32,
    /// Connection URL; takes precedence over host and port when present.
    pub url: Option<String>,
}

impl CacheConfig {
    /// Returns `host:port`, or the URL when one is configured.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.host, self.port))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 6379,
            password: None,
            db: 0,
            url: None,
        }
    }
}

/// Options for the schema-synchronising SQL backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSqlConfig {
    /// Database URI.
    pub uri: Option<String>,
    /// Driver-specific options passed through untouched.
    pub options: Map<String, Value>,
}

/// Options for the entity-SQL backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitySqlConfig {
    /// Named-connection identifier.
    pub name: Option<String>,
    /// Database URI.
    pub uri: Option<String>,
    /// Driver-specific options passed through untouched.
    pub options: Map<String, Value>,
}

impl EntitySqlConfig {
    /// Returns the trimmed connection name, or `"default"` when it is unset
    /// or blank.
    #[must_use]
    pub fn connection_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_ENTITY_CONNECTION)
    }
}

/// One named document-store connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentConnectionConfig {
    /// Identity of the adapter serving this connection.
    pub adapter: String,
    /// Adapter-specific options.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Adapter configuration for the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Named connections keyed by connection name.
    pub connections: BTreeMap<String, DocumentConnectionConfig>,
    /// Defaults applied to every collection.
    pub defaults: Map<String, Value>,
}

/// One optional configuration block per backend kind.
///
/// A missing block means the backend was not requested; it behaves exactly
/// like a skipped one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfigs {
    /// Key-value cache.
    pub cache: Option<BackendSettings<CacheConfig>>,
    /// Schema-synchronising SQL backend.
    pub sync_sql: Option<BackendSettings<SyncSqlConfig>>,
    /// Entity-SQL backend.
    pub entity_sql: Option<BackendSettings<EntitySqlConfig>>,
    /// Document store.
    pub document: Option<BackendSettings<DocumentConfig>>,
}

impl BackendConfigs {
    /// Returns whether the backend of `kind` is requested and not skipped.
    #[must_use]
    pub fn is_active(&self, kind: BackendKind) -> bool {
        let skip = match kind {
            BackendKind::Cache => self.cache.as_ref().map(|s| s.skip),
            BackendKind::SyncSql => self.sync_sql.as_ref().map(|s| s.skip),
            BackendKind::EntitySql => self.entity_sql.as_ref().map(|s| s.skip),
            BackendKind::Document => self.document.as_ref().map(|s| s.skip),
        };
        skip == Some(false)
    }

    /// Returns whether any model-owning backend is active.
    #[must_use]
    pub fn requires_models(&self) -> bool {
        BackendKind::ALL
            .into_iter()
            .filter(|kind| kind.owns_models())
            .any(|kind| self.is_active(kind))
    }
}

/// Top-level orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Backend configuration blocks.
    pub backends: BackendConfigs,
    /// Export names ignored by classification.
    pub omit_models: Vec<String>,
}

impl OrchestratorConfig {
    /// Creates a configuration with the default omit list.
    #[must_use]
    pub fn new(backends: BackendConfigs) -> Self {
        Self {
            backends,
            omit_models: vec![DEFAULT_OMITTED_MODEL.to_owned()],
        }
    }

    /// Replaces the omit list.
    #[must_use]
    pub fn with_omit_models<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.omit_models = names.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new(BackendConfigs::default())
    }
}
