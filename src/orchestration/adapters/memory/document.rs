//! In-memory document store.

use crate::orchestration::{
    domain::{CollectionDefinition, DocumentConfig},
    ports::{
        BackendPortError, BackendPortResult, ConnectionRegistry, DocumentAdapter,
        DocumentConnection, DocumentStore, DocumentStoreFactory, LiveCollection, Ontology,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

/// Defaults key naming the connection collections bind to.
const DEFAULT_CONNECTION_KEY: &str = "connection";

fn lock_error(err: impl ToString) -> BackendPortError {
    BackendPortError::runtime(std::io::Error::other(err.to_string()))
}

/// Open-connection bookkeeping kept by [`InMemoryDocumentAdapter`].
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    connections: RwLock<BTreeSet<String>>,
}

impl InMemoryConnectionRegistry {
    /// Records `connection` as open.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn register(&self, connection: &str) -> BackendPortResult<()> {
        self.connections
            .write()
            .map_err(lock_error)?
            .insert(connection.to_owned());
        Ok(())
    }

    /// Returns whether `connection` is recorded as open.
    #[must_use]
    pub fn contains(&self, connection: &str) -> bool {
        self.connections
            .read()
            .is_ok_and(|connections| connections.contains(connection))
    }
}

impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn release(&self, connection: &str) -> bool {
        self.connections
            .write()
            .is_ok_and(|mut connections| connections.remove(connection))
    }
}

/// Document adapter that records teardown calls.
#[derive(Debug)]
pub struct InMemoryDocumentAdapter {
    identity: String,
    registry: Option<InMemoryConnectionRegistry>,
    teardown_error: Option<BackendPortError>,
    torn_down: RwLock<Vec<String>>,
}

impl InMemoryDocumentAdapter {
    /// Creates an adapter that keeps a connection registry.
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            registry: Some(InMemoryConnectionRegistry::default()),
            teardown_error: None,
            torn_down: RwLock::new(Vec::new()),
        }
    }

    /// Creates an adapter without a connection registry.
    #[must_use]
    pub fn exempt(identity: impl Into<String>) -> Self {
        Self {
            registry: None,
            ..Self::new(identity)
        }
    }

    /// Makes every teardown fail with `error`.
    #[must_use]
    pub fn with_teardown_error(mut self, error: BackendPortError) -> Self {
        self.teardown_error = Some(error);
        self
    }

    /// Returns the registry, when the adapter keeps one.
    #[must_use]
    pub const fn registry(&self) -> Option<&InMemoryConnectionRegistry> {
        self.registry.as_ref()
    }

    /// Returns the connection names torn down so far, in call order.
    #[must_use]
    pub fn torn_down(&self) -> Vec<String> {
        self.torn_down
            .read()
            .map(|names| names.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentAdapter for InMemoryDocumentAdapter {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn teardown(&self, connection: &str) -> BackendPortResult<()> {
        self.torn_down
            .write()
            .map_err(lock_error)?
            .push(connection.to_owned());
        self.teardown_error.clone().map_or(Ok(()), Err)
    }

    fn connection_registry(&self) -> Option<&dyn ConnectionRegistry> {
        self.registry
            .as_ref()
            .map(|registry| registry as &dyn ConnectionRegistry)
    }
}

/// Live connection produced by [`InMemoryDocumentStore`].
#[derive(Debug)]
pub struct InMemoryDocumentConnection {
    name: String,
    adapter: Arc<InMemoryDocumentAdapter>,
}

impl DocumentConnection for InMemoryDocumentConnection {
    fn name(&self) -> &str {
        &self.name
    }

    fn adapter(&self) -> Arc<dyn DocumentAdapter> {
        Arc::clone(&self.adapter) as Arc<dyn DocumentAdapter>
    }
}

/// Parts of the ontology an in-memory store leaves out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OntologyDefect {
    /// The ontology is complete.
    #[default]
    Complete,
    /// The ontology reports no connections at all.
    MissingConnections,
    /// The ontology reports no collections at all.
    MissingCollections,
}

#[derive(Debug, Default)]
struct InMemoryDocumentState {
    adapters: BTreeMap<String, Arc<InMemoryDocumentAdapter>>,
    initialize_error: Option<BackendPortError>,
    defect: OntologyDefect,
    loaded: Vec<CollectionDefinition>,
    stores_created: usize,
}

/// Factory for in-memory document stores.
///
/// Adapters are looked up by the identity named in each connection's
/// configuration; identities that were never registered get a fresh
/// registry-keeping adapter on first use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStoreFactory {
    state: Arc<RwLock<InMemoryDocumentState>>,
}

impl InMemoryDocumentStoreFactory {
    /// Creates a factory with no registered adapters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `adapter` under its identity.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn register_adapter(
        &self,
        adapter: Arc<InMemoryDocumentAdapter>,
    ) -> BackendPortResult<()> {
        self.state
            .write()
            .map_err(lock_error)?
            .adapters
            .insert(adapter.identity.clone(), adapter);
        Ok(())
    }

    /// Returns the adapter registered or created under `identity`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn adapter(
        &self,
        identity: &str,
    ) -> BackendPortResult<Option<Arc<InMemoryDocumentAdapter>>> {
        Ok(self
            .state
            .read()
            .map_err(lock_error)?
            .adapters
            .get(identity)
            .cloned())
    }

    /// Makes `initialize` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_initialize(&self, error: BackendPortError) -> BackendPortResult<()> {
        self.state.write().map_err(lock_error)?.initialize_error = Some(error);
        Ok(())
    }

    /// Makes `initialize` report a degenerate ontology.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn with_defect(&self, defect: OntologyDefect) -> BackendPortResult<()> {
        self.state.write().map_err(lock_error)?.defect = defect;
        Ok(())
    }

    /// Returns every collection loaded into any store, in load order.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn loaded_collections(&self) -> BackendPortResult<Vec<CollectionDefinition>> {
        Ok(self.state.read().map_err(lock_error)?.loaded.clone())
    }

    /// Returns how many stores were created.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn stores_created(&self) -> BackendPortResult<usize> {
        Ok(self.state.read().map_err(lock_error)?.stores_created)
    }
}

impl DocumentStoreFactory for InMemoryDocumentStoreFactory {
    fn create(&self) -> Box<dyn DocumentStore> {
        if let Ok(mut state) = self.state.write() {
            state.stores_created += 1;
        }
        Box::new(InMemoryDocumentStore {
            state: Arc::clone(&self.state),
            collections: Vec::new(),
        })
    }
}

/// Store produced by [`InMemoryDocumentStoreFactory`].
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<InMemoryDocumentState>>,
    collections: Vec<CollectionDefinition>,
}

impl InMemoryDocumentStore {
    fn bind_target(config: &DocumentConfig) -> Option<String> {
        config
            .defaults
            .get(DEFAULT_CONNECTION_KEY)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| config.connections.keys().next().cloned())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn load_collection(&mut self, collection: CollectionDefinition) {
        if let Ok(mut state) = self.state.write() {
            state.loaded.push(collection.clone());
        }
        self.collections.push(collection);
    }

    async fn initialize(&mut self, config: &DocumentConfig) -> BackendPortResult<Ontology> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(error) = &state.initialize_error {
            return Err(error.clone());
        }

        let mut connections: BTreeMap<String, Arc<dyn DocumentConnection>> = BTreeMap::new();
        for (name, connection) in &config.connections {
            let adapter = Arc::clone(
                state
                    .adapters
                    .entry(connection.adapter.clone())
                    .or_insert_with(|| {
                        Arc::new(InMemoryDocumentAdapter::new(connection.adapter.clone()))
                    }),
            );
            if let Some(registry) = adapter.registry() {
                registry.register(name)?;
            }
            connections.insert(
                name.clone(),
                Arc::new(InMemoryDocumentConnection {
                    name: name.clone(),
                    adapter,
                }),
            );
        }

        let target = Self::bind_target(config).unwrap_or_default();
        let collections = self
            .collections
            .drain(..)
            .map(|definition| {
                (
                    definition.name().to_owned(),
                    LiveCollection::new(definition, target.clone()),
                )
            })
            .collect();

        Ok(match state.defect {
            OntologyDefect::Complete => Ontology {
                connections: Some(connections),
                collections: Some(collections),
            },
            OntologyDefect::MissingConnections => Ontology {
                connections: None,
                collections: Some(collections),
            },
            OntologyDefect::MissingCollections => Ontology {
                connections: Some(connections),
                collections: None,
            },
        })
    }
}
