//! Domain model for backend orchestration.
//!
//! The orchestration domain models caller-supplied model definitions, the
//! buckets they are classified into, and the per-backend configuration and
//! handles consumed by initiators. Connections and drivers stay outside this
//! boundary, behind the contracts in [`super::ports`].

mod bag;
mod buckets;
mod collection;
mod config;
mod entity;
mod error;
mod handle;
mod kind;
mod model;
mod sql_model;

pub use bag::{ModelBag, ModelEntry};
pub use buckets::{BucketParts, ClassificationBuckets, DocumentModel};
pub use collection::CollectionDefinition;
pub use config::{
    BackendConfigs, BackendSettings, CacheConfig, DEFAULT_ENTITY_CONNECTION,
    DEFAULT_OMITTED_MODEL, DocumentConfig, DocumentConnectionConfig, EntitySqlConfig,
    OrchestratorConfig, SyncSqlConfig,
};
pub use entity::{EntityColumn, EntitySchema};
pub use error::{OrchestrationDomainError, ParseBackendKindError};
pub use handle::{ActiveBackend, BackendHandle};
pub use kind::BackendKind;
pub use model::{ModelBody, ModelDefinition, ModelFactory, ModelMarkers, RealizeContext};
pub use sql_model::{SqlAttribute, SqlModel};
