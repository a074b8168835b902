//! In-memory schema-synchronising SQL driver.

use crate::orchestration::{
    domain::{SqlModel, SyncSqlConfig},
    ports::{BackendPortError, BackendPortResult, SyncSqlConnection, SyncSqlDriver},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Dialect reported by in-memory connections.
pub const IN_MEMORY_DIALECT: &str = "memory";

/// Sync-SQL driver that records schema synchronisation instead of running
/// DDL.
///
/// Connections share the driver's state, so failures injected on the driver
/// apply to connections that are already open.
#[derive(Debug, Clone, Default)]
pub struct InMemorySyncSqlDriver {
    state: Arc<RwLock<InMemorySyncSqlState>>,
}

#[derive(Debug, Default)]
struct InMemorySyncSqlState {
    connect_error: Option<BackendPortError>,
    authenticate_error: Option<BackendPortError>,
    close_error: Option<BackendPortError>,
    sync_errors: BTreeMap<String, BackendPortError>,
    connections: usize,
    synced: Vec<SqlModel>,
    closed: usize,
}

fn lock_error(err: impl ToString) -> BackendPortError {
    BackendPortError::runtime(std::io::Error::other(err.to_string()))
}

impl InMemorySyncSqlDriver {
    /// Creates a driver whose connections always succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `connect` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_connect(&self, error: BackendPortError) -> BackendPortResult<()> {
        self.state.write().map_err(lock_error)?.connect_error = Some(error);
        Ok(())
    }

    /// Makes `authenticate` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_authenticate(&self, error: BackendPortError) -> BackendPortResult<()> {
        self.state.write().map_err(lock_error)?.authenticate_error = Some(error);
        Ok(())
    }

    /// Makes synchronising the model named `model` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_sync(
        &self,
        model: impl Into<String>,
        error: BackendPortError,
    ) -> BackendPortResult<()> {
        self.state
            .write()
            .map_err(lock_error)?
            .sync_errors
            .insert(model.into(), error);
        Ok(())
    }

    /// Makes `close` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_close(&self, error: BackendPortError) -> BackendPortResult<()> {
        self.state.write().map_err(lock_error)?.close_error = Some(error);
        Ok(())
    }

    /// Returns the names of the models synchronised so far, in order.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn synced_models(&self) -> BackendPortResult<Vec<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.synced.iter().map(|model| model.name().to_owned()).collect())
    }

    /// Returns how many connections were built.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn connection_count(&self) -> BackendPortResult<usize> {
        Ok(self.state.read().map_err(lock_error)?.connections)
    }

    /// Returns how many times a connection was closed successfully.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn close_count(&self) -> BackendPortResult<usize> {
        Ok(self.state.read().map_err(lock_error)?.closed)
    }
}

impl SyncSqlDriver for InMemorySyncSqlDriver {
    fn connect(&self, _config: &SyncSqlConfig) -> BackendPortResult<Arc<dyn SyncSqlConnection>> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(error) = &state.connect_error {
            return Err(error.clone());
        }
        state.connections += 1;
        Ok(Arc::new(InMemorySyncSqlConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

/// Connection produced by [`InMemorySyncSqlDriver`].
#[derive(Debug)]
pub struct InMemorySyncSqlConnection {
    state: Arc<RwLock<InMemorySyncSqlState>>,
}

#[async_trait]
impl SyncSqlConnection for InMemorySyncSqlConnection {
    fn dialect(&self) -> &'static str {
        IN_MEMORY_DIALECT
    }

    async fn authenticate(&self) -> BackendPortResult<()> {
        let state = self.state.read().map_err(lock_error)?;
        state.authenticate_error.clone().map_or(Ok(()), Err)
    }

    async fn sync(&self, model: &SqlModel) -> BackendPortResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(error) = state.sync_errors.get(model.name()) {
            return Err(error.clone());
        }
        state.synced.push(model.clone());
        Ok(())
    }

    async fn close(&self) -> BackendPortResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(error) = &state.close_error {
            return Err(error.clone());
        }
        state.closed += 1;
        Ok(())
    }
}
