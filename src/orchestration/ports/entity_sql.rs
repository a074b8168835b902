//! Entity-SQL port.

use super::{BackendPortError, BackendPortResult};
use crate::orchestration::domain::{EntitySchema, EntitySqlConfig};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Options for opening one named entity-SQL connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityConnectionOptions {
    name: String,
    uri: Option<String>,
    entities: Vec<EntitySchema>,
    options: Map<String, Value>,
}

impl EntityConnectionOptions {
    /// Builds connection options listing `entities`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendPortError::Rejected`] when two entities share a class
    /// name.
    pub fn new(
        config: &EntitySqlConfig,
        entities: Vec<EntitySchema>,
    ) -> BackendPortResult<Self> {
        let mut seen = BTreeSet::new();
        for entity in &entities {
            if !seen.insert(entity.class_name()) {
                return Err(BackendPortError::Rejected(format!(
                    "entity '{}' is listed more than once",
                    entity.class_name()
                )));
            }
        }

        Ok(Self {
            name: config.connection_name().to_owned(),
            uri: config.uri.clone(),
            entities,
            options: config.options.clone(),
        })
    }

    /// Returns the connection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the database URI, if configured.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Returns the listed entities.
    #[must_use]
    pub fn entities(&self) -> &[EntitySchema] {
        &self.entities
    }

    /// Returns the pass-through driver options.
    #[must_use]
    pub const fn options(&self) -> &Map<String, Value> {
        &self.options
    }
}

/// Open entity-SQL connection.
#[async_trait]
pub trait EntitySqlConnection: Send + Sync {
    /// Returns the connection name.
    fn name(&self) -> &str;

    /// Returns the class names of the entities registered on the connection.
    fn entity_names(&self) -> Vec<String>;

    /// Returns whether the connection is still open.
    fn is_connected(&self) -> bool;

    /// Closes the connection.
    async fn close(&self) -> BackendPortResult<()>;
}

/// Connection factory for the entity-SQL backend.
#[async_trait]
pub trait EntitySqlDriver: Send + Sync {
    /// Opens a connection with every listed entity registered.
    async fn connect(
        &self,
        options: EntityConnectionOptions,
    ) -> BackendPortResult<Arc<dyn EntitySqlConnection>>;
}
