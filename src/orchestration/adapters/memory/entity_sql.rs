//! In-memory entity-SQL driver.

use crate::orchestration::ports::{
    BackendPortError, BackendPortResult, EntityConnectionOptions, EntitySqlConnection,
    EntitySqlDriver,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Entity-SQL driver that keeps connections in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntitySqlDriver {
    state: Arc<RwLock<InMemoryEntitySqlState>>,
}

#[derive(Debug, Default)]
struct InMemoryEntitySqlState {
    connect_error: Option<BackendPortError>,
    close_error: Option<BackendPortError>,
    connections: Vec<Arc<InMemoryEntitySqlConnection>>,
}

fn lock_error(err: impl ToString) -> BackendPortError {
    BackendPortError::runtime(std::io::Error::other(err.to_string()))
}

impl InMemoryEntitySqlDriver {
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

    /// Makes closing connections opened afterwards fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_close(&self, error: BackendPortError) -> BackendPortResult<()> {
        self.state.write().map_err(lock_error)?.close_error = Some(error);
        Ok(())
    }

    /// Returns every connection opened so far.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn connections(&self) -> BackendPortResult<Vec<Arc<InMemoryEntitySqlConnection>>> {
        Ok(self.state.read().map_err(lock_error)?.connections.clone())
    }
}

#[async_trait]
impl EntitySqlDriver for InMemoryEntitySqlDriver {
    async fn connect(
        &self,
        options: EntityConnectionOptions,
    ) -> BackendPortResult<Arc<dyn EntitySqlConnection>> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(error) = &state.connect_error {
            return Err(error.clone());
        }

        let connection = Arc::new(InMemoryEntitySqlConnection {
            name: options.name().to_owned(),
            entity_names: options
                .entities()
                .iter()
                .map(|entity| entity.class_name().to_owned())
                .collect(),
            connected: AtomicBool::new(true),
            close_error: state.close_error.clone(),
            close_calls: AtomicUsize::new(0),
        });
        state.connections.push(Arc::clone(&connection));
        Ok(connection)
    }
}

/// Connection produced by [`InMemoryEntitySqlDriver`].
#[derive(Debug)]
pub struct InMemoryEntitySqlConnection {
    name: String,
    entity_names: Vec<String>,
    connected: AtomicBool,
    close_error: Option<BackendPortError>,
    close_calls: AtomicUsize,
}

impl InMemoryEntitySqlConnection {
    /// Marks the connection as dropped by the server.
    pub fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Returns how many times `close` was called.
    #[must_use]
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntitySqlConnection for InMemoryEntitySqlConnection {
    fn name(&self) -> &str {
        &self.name
    }

    fn entity_names(&self) -> Vec<String> {
        self.entity_names.clone()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn close(&self) -> BackendPortResult<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.close_error {
            return Err(error.clone());
        }
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Err(BackendPortError::Closed);
        }
        Ok(())
    }
}
