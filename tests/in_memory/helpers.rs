//! Shared test helpers for in-memory orchestration integration tests.

use ormgate::orchestration::{
    adapters::memory::{
        InMemoryCacheConnector, InMemoryDocumentStoreFactory, InMemoryEntitySqlDriver,
        InMemorySyncSqlDriver,
    },
    domain::{
        EntityColumn, EntitySchema, ModelBag, ModelDefinition, OrchestrationDomainError,
        OrchestratorConfig, RealizeContext, SqlAttribute, SqlModel,
    },
    services::{InitializeRequest, Orchestrator},
};
use rstest::fixture;
use serde_json::{Value, json};
use std::sync::Arc;

/// Orchestrator wired to in-memory adapters.
pub type MemoryOrchestrator = Orchestrator<
    InMemoryCacheConnector,
    InMemorySyncSqlDriver,
    InMemoryEntitySqlDriver,
    InMemoryDocumentStoreFactory,
>;

/// In-memory adapters kept alongside the orchestrator for assertions.
pub struct Backends {
    /// Cache connector.
    pub cache: Arc<InMemoryCacheConnector>,
    /// Sync-SQL driver.
    pub sync_sql: Arc<InMemorySyncSqlDriver>,
    /// Entity-SQL driver.
    pub entity_sql: Arc<InMemoryEntitySqlDriver>,
    /// Document store factory.
    pub document: Arc<InMemoryDocumentStoreFactory>,
}

impl Backends {
    /// Builds an orchestrator over the shared adapters.
    #[must_use]
    pub fn orchestrator(&self) -> MemoryOrchestrator {
        Orchestrator::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.sync_sql),
            Arc::clone(&self.entity_sql),
            Arc::clone(&self.document),
        )
    }
}

/// Provides fresh in-memory adapters for each test.
#[fixture]
pub fn backends() -> Backends {
    Backends {
        cache: Arc::new(InMemoryCacheConnector::new()),
        sync_sql: Arc::new(InMemorySyncSqlDriver::new()),
        entity_sql: Arc::new(InMemoryEntitySqlDriver::new()),
        document: Arc::new(InMemoryDocumentStoreFactory::new()),
    }
}

/// Sync-SQL factory producing a table with a primary key.
#[must_use]
pub fn table_factory() -> ModelDefinition {
    ModelDefinition::sync_factory(
        |context: &RealizeContext<'_>| -> Result<SqlModel, OrchestrationDomainError> {
            SqlModel::new(context.model_name())?
                .with_attribute(SqlAttribute::new("id", "BIGINT").primary_key())
        },
    )
}

/// Entity class with a primary key column.
///
/// # Panics
///
/// Panics when the class name is blank.
#[must_use]
pub fn entity(class_name: &str) -> ModelDefinition {
    let schema = EntitySchema::new(class_name)
        .and_then(|schema| schema.with_column(EntityColumn::primary("id", "uuid")))
        .expect("entity schema should be valid");
    ModelDefinition::entity_class(schema)
}

/// Document model with an identity marker.
#[must_use]
pub fn document(identity: &str) -> ModelDefinition {
    let mut attributes = serde_json::Map::new();
    attributes.insert("name".to_owned(), json!({ "type": "string" }));
    ModelDefinition::attributes(attributes).with_identity(identity)
}

/// One model per backend plus the default-omitted access token.
#[must_use]
pub fn sample_bag() -> ModelBag {
    ModelBag::new()
        .with("User", document("user"))
        .with("Widget", table_factory())
        .with("Invoice", entity("Invoice"))
        .with("AccessToken", document("accesstoken"))
}

/// Configuration JSON with every backend active.
#[must_use]
pub fn full_config_json() -> Value {
    json!({
        "backends": {
            "cache": { "host": "cache.internal", "port": 6380 },
            "sync_sql": { "uri": "postgres://app@db.internal/app" },
            "entity_sql": { "name": "reporting", "uri": "postgres://db.internal/reports" },
            "document": {
                "connections": { "primary": { "adapter": "memory" } },
                "defaults": { "connection": "primary" }
            }
        }
    })
}

/// Deserialises an orchestrator configuration.
///
/// # Panics
///
/// Panics when `value` is not a valid configuration.
#[must_use]
pub fn config(value: Value) -> OrchestratorConfig {
    serde_json::from_value(value).expect("configuration should deserialise")
}

/// Builds an initialisation request.
#[must_use]
pub fn request(models: ModelBag, value: Value) -> InitializeRequest {
    InitializeRequest::new(models, config(value))
}
