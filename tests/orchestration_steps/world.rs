//! Shared world state for orchestration BDD scenarios.

use std::sync::Arc;

use ormgate::orchestration::{
    adapters::memory::{
        InMemoryCacheConnector, InMemoryDocumentStoreFactory, InMemoryEntitySqlDriver,
        InMemorySyncSqlDriver,
    },
    domain::{
        BackendConfigs, BackendSettings, CacheConfig, DocumentConfig, DocumentConnectionConfig,
        EntitySqlConfig, ModelBag, OrchestratorConfig, SyncSqlConfig,
    },
    services::{
        CompositeResult, InitializeRequest, OrchestrationResult, Orchestrator, TeardownReport,
    },
};
use rstest::fixture;
use serde_json::Map;

/// Orchestrator type used by the BDD world.
pub type TestOrchestrator = Orchestrator<
    InMemoryCacheConnector,
    InMemorySyncSqlDriver,
    InMemoryEntitySqlDriver,
    InMemoryDocumentStoreFactory,
>;

/// Scenario world for orchestration behaviour tests.
pub struct OrchestrationWorld {
    /// Cache connector shared with the orchestrator.
    pub cache: Arc<InMemoryCacheConnector>,
    /// Sync-SQL driver shared with the orchestrator.
    pub sync_sql: Arc<InMemorySyncSqlDriver>,
    /// Entity-SQL driver shared with the orchestrator.
    pub entity_sql: Arc<InMemoryEntitySqlDriver>,
    /// Document store factory shared with the orchestrator.
    pub document: Arc<InMemoryDocumentStoreFactory>,
    /// Models handed to the next initialisation.
    pub models: ModelBag,
    /// Backend configuration for the next initialisation.
    pub backends: BackendConfigs,
    /// Result of the last initialisation.
    pub last_result: Option<OrchestrationResult<CompositeResult>>,
    /// Report of the last teardown.
    pub last_report: Option<TeardownReport>,
}

impl OrchestrationWorld {
    /// Creates a world with fresh adapters and no models.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Arc::new(InMemoryCacheConnector::new()),
            sync_sql: Arc::new(InMemorySyncSqlDriver::new()),
            entity_sql: Arc::new(InMemoryEntitySqlDriver::new()),
            document: Arc::new(InMemoryDocumentStoreFactory::new()),
            models: ModelBag::new(),
            backends: BackendConfigs::default(),
            last_result: None,
            last_report: None,
        }
    }

    /// Builds an orchestrator over the world's adapters.
    #[must_use]
    pub fn orchestrator(&self) -> TestOrchestrator {
        Orchestrator::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.sync_sql),
            Arc::clone(&self.entity_sql),
            Arc::clone(&self.document),
        )
    }

    /// Builds an initialisation request from the world's models and configuration.
    #[must_use]
    pub fn request(&self) -> InitializeRequest {
        InitializeRequest::new(
            self.models.clone(),
            OrchestratorConfig::new(self.backends.clone()),
        )
    }
}

impl Default for OrchestrationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> OrchestrationWorld {
    OrchestrationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Document configuration with one `primary` connection.
#[must_use]
pub fn primary_document_config() -> DocumentConfig {
    let mut config = DocumentConfig::default();
    config.connections.insert(
        "primary".to_owned(),
        DocumentConnectionConfig {
            adapter: "memory".to_owned(),
            options: Map::new(),
        },
    );
    config
}

/// Configuration with every backend active.
#[must_use]
pub fn every_backend_active() -> BackendConfigs {
    BackendConfigs {
        cache: Some(BackendSettings::enabled(CacheConfig::default())),
        sync_sql: Some(BackendSettings::enabled(SyncSqlConfig::default())),
        entity_sql: Some(BackendSettings::enabled(EntitySqlConfig::default())),
        document: Some(BackendSettings::enabled(primary_document_config())),
    }
}
