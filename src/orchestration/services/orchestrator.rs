//! Multi-backend initialisation.

use crate::orchestration::{
    domain::{
        ActiveBackend, BackendHandle, BackendSettings, BucketParts, ModelBag, OrchestratorConfig,
    },
    ports::{CacheConnector, DocumentStoreFactory, EntitySqlDriver, SyncSqlDriver},
    services::{
        BackendResult, CompositeResult, ModelClassifier, OrchestrationResult, TeardownCoordinator,
        TeardownReport,
        initiators::{CacheInitiator, DocumentInitiator, EntitySqlInitiator, SyncSqlInitiator},
        join::{JoinFailure, strict_join},
    },
};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, debug, error, info, warn};

/// Outcome of one backend slot: `None` when the backend is absent or skipped.
type SlotFuture<'a> = BoxFuture<'a, OrchestrationResult<Option<BackendResult>>>;

/// Input to [`Orchestrator::initialize`].
#[derive(Debug, Clone, Default)]
pub struct InitializeRequest {
    /// Exported model definitions.
    pub models: ModelBag,
    /// Backend configuration and omit list.
    pub config: OrchestratorConfig,
}

impl InitializeRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(models: ModelBag, config: OrchestratorConfig) -> Self {
        Self { models, config }
    }
}

/// Brings every configured backend up concurrently.
///
/// Initialisation classifies the exported models, starts one initiator per
/// active backend, and waits for all of them. The call succeeds only when
/// every active backend comes up; otherwise the backends that did come up
/// are released and the first error, in completion order, is returned.
#[derive(Debug)]
pub struct Orchestrator<C, S, E, D>
where
    C: CacheConnector,
    S: SyncSqlDriver,
    E: EntitySqlDriver,
    D: DocumentStoreFactory,
{
    cache: CacheInitiator<C>,
    sync_sql: SyncSqlInitiator<S>,
    entity_sql: EntitySqlInitiator<E>,
    document: DocumentInitiator<D>,
    teardown: TeardownCoordinator,
    dispatch: Option<Dispatch>,
}

impl<C, S, E, D> Orchestrator<C, S, E, D>
where
    C: CacheConnector,
    S: SyncSqlDriver,
    E: EntitySqlDriver,
    D: DocumentStoreFactory,
{
    /// Creates an orchestrator over the four backend ports.
    #[must_use]
    pub fn new(cache: Arc<C>, sync_sql: Arc<S>, entity_sql: Arc<E>, document: Arc<D>) -> Self {
        Self {
            cache: CacheInitiator::new(cache),
            sync_sql: SyncSqlInitiator::new(sync_sql),
            entity_sql: EntitySqlInitiator::new(entity_sql),
            document: DocumentInitiator::new(document),
            teardown: TeardownCoordinator::new(),
            dispatch: None,
        }
    }

    /// Routes every log line emitted by this orchestrator to `dispatch`.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.teardown = self.teardown.with_dispatch(dispatch.clone());
        self.dispatch = Some(dispatch);
        self
    }

    /// Returns the coordinator used to release backends.
    #[must_use]
    pub const fn teardown_coordinator(&self) -> &TeardownCoordinator {
        &self.teardown
    }

    /// Initialises every active backend.
    ///
    /// When no model-owning backend is active the call returns an empty
    /// [`CompositeResult`] without classifying or initiating anything, even
    /// if the cache is active.
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::orchestration::services::OrchestrationError`]
    /// raised by any initiator.
    pub async fn initialize(
        &self,
        request: InitializeRequest,
    ) -> OrchestrationResult<CompositeResult> {
        match &self.dispatch {
            Some(dispatch) => self.run(request).with_subscriber(dispatch.clone()).await,
            None => self.run(request).await,
        }
    }

    /// Initialises every active backend and hands the outcome to
    /// `on_complete`, which is called exactly once.
    pub async fn initialize_with<F>(&self, request: InitializeRequest, on_complete: F)
    where
        F: FnOnce(OrchestrationResult<CompositeResult>),
    {
        on_complete(self.initialize(request).await);
    }

    /// Releases every backend held by `composite`.
    pub async fn teardown(&self, composite: &CompositeResult) -> TeardownReport {
        self.teardown.teardown(composite).await
    }

    async fn run(&self, request: InitializeRequest) -> OrchestrationResult<CompositeResult> {
        let InitializeRequest { models, config } = request;
        let OrchestratorConfig {
            backends,
            omit_models,
        } = config;

        if !backends.requires_models() {
            warn!("no model-owning backend is active; skipping initialisation");
            return Ok(CompositeResult::new());
        }

        let buckets = ModelClassifier::new(omit_models).classify(&models);
        if !buckets.is_fully_classified() {
            warn!(
                models = ?buckets.unclassified(),
                "models matched no backend and will be ignored"
            );
        }
        let BucketParts {
            sync_sql,
            entity_sql,
            document,
            ..
        } = buckets.into_parts();

        let slots: Vec<SlotFuture<'_>> = vec![
            slot(backends.cache, (), |backend| async move {
                self.cache.initiate(backend).await.map(BackendResult::Cache)
            }),
            slot(backends.sync_sql, sync_sql, |backend| async move {
                self.sync_sql.initiate(backend).await.map(BackendResult::SyncSql)
            }),
            slot(backends.entity_sql, entity_sql, |backend| async move {
                self.entity_sql
                    .initiate(backend)
                    .await
                    .map(BackendResult::EntitySql)
            }),
            slot(backends.document, document, |backend| async move {
                self.document.initiate(backend).await.map(BackendResult::Document)
            }),
        ];

        match strict_join(slots).await {
            Ok(results) => {
                let composite: CompositeResult = results.into_iter().flatten().collect();
                info!(backends = ?composite.present_kinds(), "backends initialised");
                Ok(composite)
            }
            Err(JoinFailure { error, succeeded }) => {
                error!(backend = %error.backend(), error = %error, "backend initialisation failed");
                let partial: CompositeResult = succeeded.into_iter().flatten().collect();
                if !partial.is_empty() {
                    let report = self.teardown.teardown(&partial).await;
                    debug!(?report, "released backends after failed initialisation");
                }
                Err(error)
            }
        }
    }
}

/// Builds the future for one backend slot.
///
/// Absent and skipped backends settle immediately with `None`; their
/// configuration and models are dropped unseen.
fn slot<'a, T, M, F, Fut>(
    settings: Option<BackendSettings<T>>,
    models: M,
    start: F,
) -> SlotFuture<'a>
where
    T: Send + 'a,
    M: Send + 'a,
    F: FnOnce(ActiveBackend<T, M>) -> Fut + Send + 'a,
    Fut: Future<Output = OrchestrationResult<BackendResult>> + Send + 'a,
{
    let active = settings
        .map(|block| BackendHandle::from_settings(block, models))
        .and_then(BackendHandle::into_active);
    async move {
        match active {
            Some(backend) => start(backend).await.map(Some),
            None => Ok(None),
        }
    }
    .boxed()
}
