//! Connection-lifecycle orchestration for four persistence backends.
//!
//! Callers hand the orchestrator a bag of exported model definitions and one
//! configuration block per backend. The orchestrator classifies the models,
//! brings every active backend up concurrently, and returns a single
//! [`services::CompositeResult`]; a [`services::TeardownCoordinator`]
//! releases it again. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
