//! Ormgate: connection-lifecycle orchestration for heterogeneous
//! persistence backends.
//!
//! One call brings a key-value cache, two relational backends, and a
//! document store up concurrently from a single bag of model definitions,
//! and one call releases them again.
//!
//! # Architecture
//!
//! Ormgate follows hexagonal architecture principles:
//!
//! - **Domain**: Model definitions, classification buckets, and backend
//!   configuration
//! - **Ports**: Abstract trait interfaces for each backend
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Classification, initiation, and teardown
//!
//! # Modules
//!
//! - [`orchestration`]: Backend orchestration
//! - [`logging`]: Subscriber construction for `tracing`

pub mod logging;
pub mod orchestration;
