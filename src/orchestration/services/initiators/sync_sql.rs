//! Sync-SQL bring-up.

use crate::orchestration::{
    domain::{
        ActiveBackend, BackendKind, ModelFactory, OrchestrationDomainError, RealizeContext,
        SqlModel, SyncSqlConfig,
    },
    ports::{SyncSqlConnection, SyncSqlDriver},
    services::{OrchestrationError, OrchestrationResult, SyncSqlOutput},
};
use futures_util::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Factories owned by the sync-SQL backend, keyed by export name.
pub type SyncSqlModels = BTreeMap<String, Arc<dyn ModelFactory>>;

/// Realises model factories on a connection, authenticates it, and
/// synchronises every model's schema.
#[derive(Debug)]
pub struct SyncSqlInitiator<S>
where
    S: SyncSqlDriver,
{
    driver: Arc<S>,
}

impl<S> SyncSqlInitiator<S>
where
    S: SyncSqlDriver,
{
    /// Creates an initiator over `driver`.
    #[must_use]
    pub const fn new(driver: Arc<S>) -> Self {
        Self { driver }
    }

    /// Brings the sync-SQL backend up.
    ///
    /// Every factory is realised before the connection is authenticated.
    /// Associations must name models owned by the same backend. Schema
    /// synchronisation runs for all models concurrently and stops at the
    /// first failure. A connection that fails after being built is closed
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::Connect`],
    /// [`OrchestrationError::Realize`],
    /// [`OrchestrationError::Authenticate`], or
    /// [`OrchestrationError::Sync`] for the step that failed.
    pub async fn initiate(
        &self,
        backend: ActiveBackend<SyncSqlConfig, SyncSqlModels>,
    ) -> OrchestrationResult<SyncSqlOutput> {
        let (config, factories) = backend.into_parts();
        let names: Vec<String> = factories.keys().cloned().collect();
        info!(backend = %BackendKind::SyncSql, models = ?names, "initiating backend");

        let connection = self
            .driver
            .connect(&config)
            .map_err(|source| OrchestrationError::connect(BackendKind::SyncSql, source))?;

        match bring_up(connection.as_ref(), &factories, &names).await {
            Ok(models) => Ok(SyncSqlOutput::new(connection, models)),
            Err(error) => {
                if let Err(close_error) = connection.close().await {
                    warn!(
                        backend = %BackendKind::SyncSql,
                        error = %close_error,
                        "failed to close connection after bring-up failure"
                    );
                }
                Err(error)
            }
        }
    }
}

async fn bring_up(
    connection: &dyn SyncSqlConnection,
    factories: &SyncSqlModels,
    names: &[String],
) -> OrchestrationResult<BTreeMap<String, SqlModel>> {
    let models = realize_all(connection.dialect(), factories, names)?;

    connection
        .authenticate()
        .await
        .map_err(|source| OrchestrationError::Authenticate {
            backend: BackendKind::SyncSql,
            source,
        })?;

    try_join_all(models.iter().map(|(name, model)| async move {
        connection
            .sync(model)
            .await
            .map_err(|source| OrchestrationError::Sync {
                model: name.clone(),
                source,
            })
    }))
    .await?;

    Ok(models)
}

fn realize_all(
    dialect: &str,
    factories: &SyncSqlModels,
    names: &[String],
) -> OrchestrationResult<BTreeMap<String, SqlModel>> {
    let mut models = BTreeMap::new();
    for (name, factory) in factories {
        let context = RealizeContext::new(name, dialect, names);
        let model = factory
            .realize(&context)
            .map_err(|source| OrchestrationError::Realize {
                model: name.clone(),
                source,
            })?;
        models.insert(name.clone(), model);
    }

    for (name, model) in &models {
        if let Some(target) = model
            .associations()
            .iter()
            .find(|target| !models.contains_key(target.as_str()))
        {
            return Err(OrchestrationError::Realize {
                model: name.clone(),
                source: OrchestrationDomainError::UnknownAssociation {
                    model: name.clone(),
                    target: target.clone(),
                },
            });
        }
    }
    Ok(models)
}
