//! Entity-SQL bring-up.

use crate::orchestration::{
    domain::{ActiveBackend, BackendKind, EntitySchema, EntitySqlConfig},
    ports::{EntityConnectionOptions, EntitySqlDriver},
    services::{EntitySqlOutput, OrchestrationError, OrchestrationResult},
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Entity schemas owned by the entity-SQL backend, keyed by export name.
pub type EntitySqlModels = BTreeMap<String, EntitySchema>;

/// Opens one named connection listing every owned entity.
#[derive(Debug)]
pub struct EntitySqlInitiator<E>
where
    E: EntitySqlDriver,
{
    driver: Arc<E>,
}

impl<E> EntitySqlInitiator<E>
where
    E: EntitySqlDriver,
{
    /// Creates an initiator over `driver`.
    #[must_use]
    pub const fn new(driver: Arc<E>) -> Self {
        Self { driver }
    }

    /// Brings the entity-SQL backend up.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::InvalidOptions`] when the connection
    /// options cannot be built and [`OrchestrationError::Connect`] when the
    /// connection fails to open.
    pub async fn initiate(
        &self,
        backend: ActiveBackend<EntitySqlConfig, EntitySqlModels>,
    ) -> OrchestrationResult<EntitySqlOutput> {
        let (config, entities) = backend.into_parts();
        info!(
            backend = %BackendKind::EntitySql,
            connection = config.connection_name(),
            models = ?entities.keys().collect::<Vec<_>>(),
            "initiating backend"
        );

        let options = EntityConnectionOptions::new(&config, entities.into_values().collect())
            .map_err(|source| OrchestrationError::InvalidOptions {
                backend: BackendKind::EntitySql,
                reason: source.to_string(),
            })?;
        let connection = self
            .driver
            .connect(options)
            .await
            .map_err(|source| OrchestrationError::connect(BackendKind::EntitySql, source))?;
        Ok(EntitySqlOutput::new(connection))
    }
}
