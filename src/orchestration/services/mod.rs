//! Application services for backend orchestration.

mod classifier;
mod composite;
mod error;
pub mod initiators;
pub mod join;
mod orchestrator;
mod teardown;

pub use classifier::ModelClassifier;
pub use composite::{
    BackendResult, CacheOutput, CompositeResult, DocumentOutput, EntitySqlOutput, SyncSqlOutput,
};
pub use error::{OrchestrationError, OrchestrationResult};
pub use orchestrator::{InitializeRequest, Orchestrator};
pub use teardown::{SlotTeardown, TeardownCoordinator, TeardownReport};
