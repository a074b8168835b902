//! Document-store port.
//!
//! A store is created empty, has collections loaded into it, and is then
//! initialised exactly once. Initialisation yields the live ontology: the
//! named connections and the collections bound to them.

use super::BackendPortResult;
use crate::orchestration::domain::{CollectionDefinition, DocumentConfig};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of open connections kept by an adapter.
pub trait ConnectionRegistry: Send + Sync {
    /// Drops the bookkeeping entry for `connection`.
    ///
    /// Returns whether an entry was removed.
    fn release(&self, connection: &str) -> bool;
}

/// Adapter serving one or more document-store connections.
#[async_trait]
pub trait DocumentAdapter: Send + Sync {
    /// Returns the adapter identity.
    fn identity(&self) -> &str;

    /// Tears down the connection named `connection`.
    async fn teardown(&self, connection: &str) -> BackendPortResult<()>;

    /// Returns the adapter's connection registry.
    ///
    /// Adapters without one are exempt from registry cleanup.
    fn connection_registry(&self) -> Option<&dyn ConnectionRegistry>;
}

/// A live, named document-store connection.
pub trait DocumentConnection: Send + Sync {
    /// Returns the connection name.
    fn name(&self) -> &str;

    /// Returns the adapter serving the connection.
    fn adapter(&self) -> Arc<dyn DocumentAdapter>;
}

/// A collection bound to a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveCollection {
    definition: CollectionDefinition,
    connection: String,
}

impl LiveCollection {
    /// Binds `definition` to the connection named `connection`.
    #[must_use]
    pub fn new(definition: CollectionDefinition, connection: impl Into<String>) -> Self {
        Self {
            definition,
            connection: connection.into(),
        }
    }

    /// Returns the loaded definition.
    #[must_use]
    pub const fn definition(&self) -> &CollectionDefinition {
        &self.definition
    }

    /// Returns the name of the connection serving the collection.
    #[must_use]
    pub fn connection(&self) -> &str {
        &self.connection
    }
}

/// Result of initialising a document store.
///
/// Either part may be absent when an adapter reports a degenerate ontology.
#[derive(Clone, Default)]
pub struct Ontology {
    /// Live connections keyed by name.
    pub connections: Option<BTreeMap<String, Arc<dyn DocumentConnection>>>,
    /// Live collections keyed by export name.
    pub collections: Option<BTreeMap<String, LiveCollection>>,
}

/// Document store being prepared for initialisation.
#[async_trait]
pub trait DocumentStore: Send {
    /// Registers a collection to be created on initialisation.
    fn load_collection(&mut self, collection: CollectionDefinition);

    /// Initialises every loaded collection against `config`.
    async fn initialize(&mut self, config: &DocumentConfig) -> BackendPortResult<Ontology>;
}

/// Document store factory.
pub trait DocumentStoreFactory: Send + Sync {
    /// Creates an empty store.
    fn create(&self) -> Box<dyn DocumentStore>;
}
