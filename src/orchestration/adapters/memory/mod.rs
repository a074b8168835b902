//! In-memory adapters for every backend port.
//!
//! These adapters keep all state in process and expose failure injection so
//! orchestration flows can be exercised deterministically.

mod cache;
mod document;
mod entity_sql;
mod sync_sql;

pub use cache::{InMemoryCacheClient, InMemoryCacheConnector};
pub use document::{
    InMemoryConnectionRegistry, InMemoryDocumentAdapter, InMemoryDocumentConnection,
    InMemoryDocumentStore, InMemoryDocumentStoreFactory, OntologyDefect,
};
pub use entity_sql::{InMemoryEntitySqlConnection, InMemoryEntitySqlDriver};
pub use sync_sql::{IN_MEMORY_DIALECT, InMemorySyncSqlConnection, InMemorySyncSqlDriver};
