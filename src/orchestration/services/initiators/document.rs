//! Document-store bring-up.

use crate::orchestration::{
    domain::{ActiveBackend, BackendKind, CollectionDefinition, DocumentConfig, DocumentModel},
    ports::{DocumentStoreFactory, Ontology},
    services::{DocumentOutput, OrchestrationError, OrchestrationResult},
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Loads every owned collection into a fresh store and initialises it once.
#[derive(Debug)]
pub struct DocumentInitiator<D>
where
    D: DocumentStoreFactory,
{
    factory: Arc<D>,
}

impl<D> DocumentInitiator<D>
where
    D: DocumentStoreFactory,
{
    /// Creates an initiator over `factory`.
    #[must_use]
    pub const fn new(factory: Arc<D>) -> Self {
        Self { factory }
    }

    /// Brings the document store up.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::Connect`] when initialisation fails and
    /// [`OrchestrationError::StructuralMismatch`] when the resulting
    /// ontology has no connections or no collections.
    pub async fn initiate(
        &self,
        backend: ActiveBackend<DocumentConfig, Vec<DocumentModel>>,
    ) -> OrchestrationResult<DocumentOutput> {
        let (config, models) = backend.into_parts();
        info!(
            backend = %BackendKind::Document,
            models = ?models.iter().map(DocumentModel::name).collect::<Vec<_>>(),
            "initiating backend"
        );

        let mut store = self.factory.create();
        for model in &models {
            store.load_collection(CollectionDefinition::from_model(
                model.name(),
                model.definition(),
            ));
        }
        let Ontology {
            connections,
            collections,
        } = store
            .initialize(&config)
            .await
            .map_err(|source| OrchestrationError::connect(BackendKind::Document, source))?;

        match (connections, collections) {
            (Some(connections), Some(collections))
                if !connections.is_empty() && !collections.is_empty() =>
            {
                Ok(DocumentOutput::new(connections, collections))
            }
            (reported_connections, reported_collections) => {
                Err(OrchestrationError::StructuralMismatch {
                    connections: reported_connections.as_ref().map_or(0, BTreeMap::len),
                    collections: reported_collections.as_ref().map_or(0, BTreeMap::len),
                })
            }
        }
    }
}
