//! Schema-synchronising SQL port.

use super::BackendPortResult;
use crate::orchestration::domain::{SqlModel, SyncSqlConfig};
use async_trait::async_trait;
use std::sync::Arc;

/// Open connection to a schema-synchronising SQL database.
#[async_trait]
pub trait SyncSqlConnection: Send + Sync {
    /// Returns the SQL dialect spoken by the connection.
    fn dialect(&self) -> &'static str;

    /// Verifies the connection credentials.
    ///
    /// # Errors
    ///
    /// Returns [`super::BackendPortError::Authentication`] when the
    /// credentials are refused.
    async fn authenticate(&self) -> BackendPortResult<()>;

    /// Creates or updates the table backing `model`.
    async fn sync(&self, model: &SqlModel) -> BackendPortResult<()>;

    /// Closes the connection.
    async fn close(&self) -> BackendPortResult<()>;
}

/// Connection factory for the schema-synchronising SQL backend.
pub trait SyncSqlDriver: Send + Sync {
    /// Builds a connection from `config` without authenticating it.
    ///
    /// # Errors
    ///
    /// Returns [`super::BackendPortError`] when the configuration cannot be
    /// turned into a connection.
    fn connect(&self, config: &SyncSqlConfig) -> BackendPortResult<Arc<dyn SyncSqlConnection>>;
}
