//! Cache bring-up.

use crate::orchestration::{
    domain::{ActiveBackend, BackendKind, CacheConfig},
    ports::{BackendPortError, CacheConnector, CacheEvent, CacheSession},
    services::{CacheOutput, OrchestrationError, OrchestrationResult},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Opens a cache client and waits for its first connection event.
#[derive(Debug)]
pub struct CacheInitiator<C>
where
    C: CacheConnector,
{
    connector: Arc<C>,
}

impl<C> CacheInitiator<C>
where
    C: CacheConnector,
{
    /// Creates an initiator over `connector`.
    #[must_use]
    pub const fn new(connector: Arc<C>) -> Self {
        Self { connector }
    }

    /// Brings the cache up.
    ///
    /// Whichever of connect or error is reported first decides the outcome;
    /// anything the client reports afterwards is ignored. A client whose
    /// event stream closes without reporting either counts as a connect
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::Connect`] when the client cannot be
    /// created or reports an error first.
    pub async fn initiate(
        &self,
        backend: ActiveBackend<CacheConfig, ()>,
    ) -> OrchestrationResult<CacheOutput> {
        let (config, ()) = backend.into_parts();
        let endpoint = config.endpoint();
        info!(backend = %BackendKind::Cache, endpoint = %endpoint, "initiating backend");

        let CacheSession { client, mut events } = self
            .connector
            .open(&config)
            .map_err(|source| OrchestrationError::connect(BackendKind::Cache, source))?;

        let failure = match events.recv().await {
            Some(CacheEvent::Connected) => return Ok(CacheOutput::new(client)),
            Some(CacheEvent::Error(source)) => source,
            None => BackendPortError::unreachable(
                endpoint,
                "event stream closed before the client connected",
            ),
        };
        debug!(backend = %BackendKind::Cache, error = %failure, "disconnecting failed client");
        client.disconnect();
        Err(OrchestrationError::connect(BackendKind::Cache, failure))
    }
}
