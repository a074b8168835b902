//! `PostgreSQL` driver for the schema-synchronising SQL backend.

use crate::orchestration::{
    domain::{SqlModel, SyncSqlConfig},
    ports::{BackendPortError, BackendPortResult, SyncSqlConnection, SyncSqlDriver},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Dialect reported by `PostgreSQL` connections.
pub const POSTGRES_DIALECT: &str = "postgres";

/// Sync-SQL driver holding one Diesel connection per backend.
///
/// Building a connection does not dial the server; the first round trip is
/// [`SyncSqlConnection::authenticate`], which makes exactly one connect
/// attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresSyncSqlDriver;

impl PostgresSyncSqlDriver {
    /// Creates the driver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SyncSqlDriver for PostgresSyncSqlDriver {
    fn connect(&self, config: &SyncSqlConfig) -> BackendPortResult<Arc<dyn SyncSqlConnection>> {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| BackendPortError::Rejected("a database URI is required".to_owned()))?;

        Ok(Arc::new(PostgresSyncSqlConnection {
            endpoint: redact_credentials(uri),
            uri: uri.to_owned(),
            state: Arc::new(Mutex::new(ConnectionState::Idle)),
        }))
    }
}

enum ConnectionState {
    Idle,
    Open(PgConnection),
    Closed,
}

/// Connection produced by [`PostgresSyncSqlDriver`].
///
/// The server connection is established on first use and dropped by
/// [`SyncSqlConnection::close`]; statements issued concurrently run one at a
/// time.
pub struct PostgresSyncSqlConnection {
    endpoint: String,
    uri: String,
    state: Arc<Mutex<ConnectionState>>,
}

impl fmt::Debug for PostgresSyncSqlConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSyncSqlConnection")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

fn lock_state(
    state: &Mutex<ConnectionState>,
) -> BackendPortResult<MutexGuard<'_, ConnectionState>> {
    state
        .lock()
        .map_err(|err| BackendPortError::runtime(std::io::Error::other(err.to_string())))
}

impl PostgresSyncSqlConnection {
    async fn run_blocking<F, T>(&self, f: F) -> BackendPortResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BackendPortResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let uri = self.uri.clone();
        let endpoint = self.endpoint.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = lock_state(&state)?;
            if matches!(*guard, ConnectionState::Idle) {
                let connection = PgConnection::establish(&uri)
                    .map_err(|err| BackendPortError::unreachable(endpoint, err.to_string()))?;
                *guard = ConnectionState::Open(connection);
            }
            match &mut *guard {
                ConnectionState::Open(connection) => f(connection),
                ConnectionState::Idle | ConnectionState::Closed => Err(BackendPortError::Closed),
            }
        })
        .await
        .map_err(BackendPortError::runtime)?
    }
}

#[async_trait]
impl SyncSqlConnection for PostgresSyncSqlConnection {
    fn dialect(&self) -> &'static str {
        POSTGRES_DIALECT
    }

    async fn authenticate(&self) -> BackendPortResult<()> {
        self.run_blocking(|connection| {
            diesel::sql_query("SELECT 1")
                .execute(connection)
                .map_err(|err| BackendPortError::Authentication(err.to_string()))?;
            Ok(())
        })
        .await
    }

    async fn sync(&self, model: &SqlModel) -> BackendPortResult<()> {
        let ddl = model.create_table_sql();
        self.run_blocking(move |connection| {
            connection
                .batch_execute(&ddl)
                .map_err(BackendPortError::runtime)
        })
        .await
    }

    async fn close(&self) -> BackendPortResult<()> {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || {
            let mut guard = lock_state(&state)?;
            match std::mem::replace(&mut *guard, ConnectionState::Closed) {
                ConnectionState::Closed => Err(BackendPortError::Closed),
                ConnectionState::Idle | ConnectionState::Open(_) => Ok(()),
            }
        })
        .await
        .map_err(BackendPortError::runtime)?
    }
}

/// Strips the user-info part of a connection URI for error messages.
fn redact_credentials(uri: &str) -> String {
    match (uri.split_once("://"), uri.rsplit_once('@')) {
        (Some((scheme, _)), Some((_, host))) => format!("{scheme}://{host}"),
        _ => uri.to_owned(),
    }
}
