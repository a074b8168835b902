//! Port contracts for the four persistence backends.
//!
//! Ports hide backend wire protocols behind async traits so initiators and
//! the teardown coordinator can be exercised without live services.

mod cache;
mod document;
mod entity_sql;
mod error;
mod sync_sql;

pub use cache::{CacheClient, CacheConnector, CacheEvent, CacheSession};
pub use document::{
    ConnectionRegistry, DocumentAdapter, DocumentConnection, DocumentStore, DocumentStoreFactory,
    LiveCollection, Ontology,
};
pub use entity_sql::{EntityConnectionOptions, EntitySqlConnection, EntitySqlDriver};
pub use error::{BackendPortError, BackendPortResult};
pub use sync_sql::{SyncSqlConnection, SyncSqlDriver};
