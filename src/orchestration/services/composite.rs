//! Aggregated initialisation results.

use crate::orchestration::{
    domain::{BackendKind, SqlModel},
    ports::{
        CacheClient, DocumentConnection, EntitySqlConnection, LiveCollection, SyncSqlConnection,
    },
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Live cache client.
#[derive(Clone)]
pub struct CacheOutput {
    client: Arc<dyn CacheClient>,
}

impl CacheOutput {
    /// Wraps a connected client.
    #[must_use]
    pub const fn new(client: Arc<dyn CacheClient>) -> Self {
        Self { client }
    }

    /// Returns the client.
    #[must_use]
    pub const fn client(&self) -> &Arc<dyn CacheClient> {
        &self.client
    }
}

impl fmt::Debug for CacheOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOutput")
            .field("endpoint", &self.client.endpoint())
            .finish()
    }
}

/// Authenticated sync-SQL connection and its synchronised models.
#[derive(Clone)]
pub struct SyncSqlOutput {
    connection: Arc<dyn SyncSqlConnection>,
    models: BTreeMap<String, SqlModel>,
}

impl SyncSqlOutput {
    /// Bundles a connection with the models synchronised on it.
    #[must_use]
    pub const fn new(
        connection: Arc<dyn SyncSqlConnection>,
        models: BTreeMap<String, SqlModel>,
    ) -> Self {
        Self { connection, models }
    }

    /// Returns the connection.
    #[must_use]
    pub const fn connection(&self) -> &Arc<dyn SyncSqlConnection> {
        &self.connection
    }

    /// Returns the realised models keyed by export name.
    #[must_use]
    pub const fn models(&self) -> &BTreeMap<String, SqlModel> {
        &self.models
    }
}

impl fmt::Debug for SyncSqlOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSqlOutput")
            .field("dialect", &self.connection.dialect())
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Open entity-SQL connection.
#[derive(Clone)]
pub struct EntitySqlOutput {
    connection: Arc<dyn EntitySqlConnection>,
}

impl EntitySqlOutput {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(connection: Arc<dyn EntitySqlConnection>) -> Self {
        Self { connection }
    }

    /// Returns the connection.
    #[must_use]
    pub const fn connection(&self) -> &Arc<dyn EntitySqlConnection> {
        &self.connection
    }
}

impl fmt::Debug for EntitySqlOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySqlOutput")
            .field("name", &self.connection.name())
            .field("entities", &self.connection.entity_names())
            .finish()
    }
}

/// Live document-store ontology.
#[derive(Clone)]
pub struct DocumentOutput {
    connections: BTreeMap<String, Arc<dyn DocumentConnection>>,
    collections: BTreeMap<String, LiveCollection>,
}

impl DocumentOutput {
    /// Bundles live connections and collections.
    #[must_use]
    pub const fn new(
        connections: BTreeMap<String, Arc<dyn DocumentConnection>>,
        collections: BTreeMap<String, LiveCollection>,
    ) -> Self {
        Self {
            connections,
            collections,
        }
    }

    /// Returns the live connections keyed by name.
    #[must_use]
    pub const fn connections(&self) -> &BTreeMap<String, Arc<dyn DocumentConnection>> {
        &self.connections
    }

    /// Returns the live collections keyed by export name.
    #[must_use]
    pub const fn collections(&self) -> &BTreeMap<String, LiveCollection> {
        &self.collections
    }
}

impl fmt::Debug for DocumentOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentOutput")
            .field("connections", &self.connections.keys().collect::<Vec<_>>())
            .field("collections", &self.collections.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Output of one successful initiator.
#[derive(Debug, Clone)]
pub enum BackendResult {
    /// Cache client.
    Cache(CacheOutput),
    /// Sync-SQL connection and models.
    SyncSql(SyncSqlOutput),
    /// Entity-SQL connection.
    EntitySql(EntitySqlOutput),
    /// Document-store ontology.
    Document(DocumentOutput),
}

impl BackendResult {
    /// Returns the backend that produced the result.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Cache(_) => BackendKind::Cache,
            Self::SyncSql(_) => BackendKind::SyncSql,
            Self::EntitySql(_) => BackendKind::EntitySql,
            Self::Document(_) => BackendKind::Document,
        }
    }
}

/// One optional result per backend kind.
///
/// A slot is empty when its backend was skipped or never requested; the two
/// cases are indistinguishable. Cloning shares the underlying handles.
#[derive(Debug, Clone, Default)]
pub struct CompositeResult {
    cache: Option<CacheOutput>,
    sync_sql: Option<SyncSqlOutput>,
    entity_sql: Option<EntitySqlOutput>,
    document: Option<DocumentOutput>,
}

impl CompositeResult {
    /// Creates a composite with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cache slot.
    #[must_use]
    pub const fn cache(&self) -> Option<&CacheOutput> {
        self.cache.as_ref()
    }

    /// Returns the sync-SQL slot.
    #[must_use]
    pub const fn sync_sql(&self) -> Option<&SyncSqlOutput> {
        self.sync_sql.as_ref()
    }

    /// Returns the entity-SQL slot.
    #[must_use]
    pub const fn entity_sql(&self) -> Option<&EntitySqlOutput> {
        self.entity_sql.as_ref()
    }

    /// Returns the document slot.
    #[must_use]
    pub const fn document(&self) -> Option<&DocumentOutput> {
        self.document.as_ref()
    }

    /// Returns whether the slot for `kind` holds a result.
    #[must_use]
    pub const fn contains(&self, kind: BackendKind) -> bool {
        match kind {
            BackendKind::Cache => self.cache.is_some(),
            BackendKind::SyncSql => self.sync_sql.is_some(),
            BackendKind::EntitySql => self.entity_sql.is_some(),
            BackendKind::Document => self.document.is_some(),
        }
    }

    /// Returns the kinds whose slot holds a result.
    #[must_use]
    pub fn present_kinds(&self) -> Vec<BackendKind> {
        BackendKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// Returns whether every slot is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cache.is_none()
            && self.sync_sql.is_none()
            && self.entity_sql.is_none()
            && self.document.is_none()
    }

    /// Stores `result` in its slot, replacing any previous value.
    pub(crate) fn insert(&mut self, result: BackendResult) {
        match result {
            BackendResult::Cache(output) => self.cache = Some(output),
            BackendResult::SyncSql(output) => self.sync_sql = Some(output),
            BackendResult::EntitySql(output) => self.entity_sql = Some(output),
            BackendResult::Document(output) => self.document = Some(output),
        }
    }
}

impl FromIterator<BackendResult> for CompositeResult {
    fn from_iter<I: IntoIterator<Item = BackendResult>>(iter: I) -> Self {
        let mut composite = Self::new();
        for result in iter {
            composite.insert(result);
        }
        composite
    }
}
