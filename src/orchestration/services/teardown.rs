//! Lenient, concurrent release of initialised backends.

use crate::orchestration::{
    domain::BackendKind,
    ports::DocumentConnection,
    services::{
        CacheOutput, CompositeResult, DocumentOutput, EntitySqlOutput, SyncSqlOutput,
        join::lenient_join,
    },
};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Ready, ready};
use std::sync::Arc;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, debug, info, warn};

/// Outcome of releasing one backend slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotTeardown {
    /// The slot held no result.
    Absent,
    /// The backend was released.
    Closed,
    /// The backend had already disconnected, so nothing was closed.
    AlreadyClosed,
    /// Releasing the backend failed.
    Failed(String),
}

impl SlotTeardown {
    /// Returns whether the slot failed to release.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Per-backend teardown outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    cache: SlotTeardown,
    sync_sql: SlotTeardown,
    entity_sql: SlotTeardown,
    document: SlotTeardown,
}

impl Default for TeardownReport {
    fn default() -> Self {
        Self {
            cache: SlotTeardown::Absent,
            sync_sql: SlotTeardown::Absent,
            entity_sql: SlotTeardown::Absent,
            document: SlotTeardown::Absent,
        }
    }
}

impl TeardownReport {
    /// Returns the outcome for `kind`.
    #[must_use]
    pub const fn slot(&self, kind: BackendKind) -> &SlotTeardown {
        match kind {
            BackendKind::Cache => &self.cache,
            BackendKind::SyncSql => &self.sync_sql,
            BackendKind::EntitySql => &self.entity_sql,
            BackendKind::Document => &self.document,
        }
    }

    /// Returns whether no slot failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        BackendKind::ALL
            .into_iter()
            .all(|kind| !self.slot(kind).is_failed())
    }

    /// Returns the failed slots with their reasons.
    #[must_use]
    pub fn failures(&self) -> Vec<(BackendKind, &str)> {
        BackendKind::ALL
            .into_iter()
            .filter_map(|kind| match self.slot(kind) {
                SlotTeardown::Failed(reason) => Some((kind, reason.as_str())),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, kind: BackendKind, outcome: SlotTeardown) {
        match kind {
            BackendKind::Cache => self.cache = outcome,
            BackendKind::SyncSql => self.sync_sql = outcome,
            BackendKind::EntitySql => self.entity_sql = outcome,
            BackendKind::Document => self.document = outcome,
        }
    }
}

/// Releases every backend held by a [`CompositeResult`].
///
/// All four slots are released concurrently and a failing slot never stops
/// the others; failures only show up in the returned [`TeardownReport`].
#[derive(Debug, Clone, Default)]
pub struct TeardownCoordinator {
    dispatch: Option<Dispatch>,
}

impl TeardownCoordinator {
    /// Creates a coordinator that logs through the ambient subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes teardown logs to `dispatch`.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Releases every populated slot of `composite`.
    pub async fn teardown(&self, composite: &CompositeResult) -> TeardownReport {
        match &self.dispatch {
            Some(dispatch) => release_all(composite).with_subscriber(dispatch.clone()).await,
            None => release_all(composite).await,
        }
    }
}

async fn release_all(composite: &CompositeResult) -> TeardownReport {
    let slots: [BoxFuture<'_, (BackendKind, SlotTeardown)>; 4] = [
        release_optional(BackendKind::Cache, composite.cache(), release_cache),
        release_optional(BackendKind::SyncSql, composite.sync_sql(), release_sync_sql),
        release_optional(
            BackendKind::EntitySql,
            composite.entity_sql(),
            release_entity_sql,
        ),
        release_optional(BackendKind::Document, composite.document(), release_document),
    ];

    let mut report = TeardownReport::default();
    for (kind, outcome) in lenient_join(slots).await {
        if let SlotTeardown::Failed(reason) = &outcome {
            warn!(backend = %kind, reason = %reason, "backend teardown failed");
        }
        report.record(kind, outcome);
    }
    info!(clean = report.is_clean(), "teardown complete");
    report
}

fn release_optional<'a, T, F, Fut>(
    kind: BackendKind,
    output: Option<&'a T>,
    release: F,
) -> BoxFuture<'a, (BackendKind, SlotTeardown)>
where
    T: Sync,
    F: FnOnce(&'a T) -> Fut + Send + 'a,
    Fut: Future<Output = SlotTeardown> + Send + 'a,
{
    async move {
        let outcome = match output {
            Some(output) => release(output).await,
            None => SlotTeardown::Absent,
        };
        (kind, outcome)
    }
    .boxed()
}

fn release_cache(output: &CacheOutput) -> Ready<SlotTeardown> {
    output.client().disconnect();
    ready(SlotTeardown::Closed)
}

async fn release_sync_sql(output: &SyncSqlOutput) -> SlotTeardown {
    match output.connection().close().await {
        Ok(()) => SlotTeardown::Closed,
        Err(err) => SlotTeardown::Failed(err.to_string()),
    }
}

async fn release_entity_sql(output: &EntitySqlOutput) -> SlotTeardown {
    let connection = output.connection();
    if !connection.is_connected() {
        debug!(connection = connection.name(), "entity connection already closed");
        return SlotTeardown::AlreadyClosed;
    }
    match connection.close().await {
        Ok(()) => SlotTeardown::Closed,
        Err(err) => SlotTeardown::Failed(err.to_string()),
    }
}

async fn teardown_connection(connection: Arc<dyn DocumentConnection>) -> Result<(), String> {
    let name = connection.name().to_owned();
    connection
        .adapter()
        .teardown(&name)
        .await
        .map_err(|err| format!("{name}: {err}"))
}

async fn release_document(output: &DocumentOutput) -> SlotTeardown {
    let connections: Vec<&Arc<dyn DocumentConnection>> = output.connections().values().collect();
    let pending: Vec<BoxFuture<'static, Result<(), String>>> = connections
        .iter()
        .map(|connection| teardown_connection(Arc::clone(connection)).boxed())
        .collect();
    let outcomes = lenient_join(pending).await;

    for connection in &connections {
        let adapter = connection.adapter();
        if let Some(registry) = adapter.connection_registry() {
            registry.release(connection.name());
        }
    }

    let failures: Vec<String> = outcomes.into_iter().filter_map(Result::err).collect();
    if failures.is_empty() {
        SlotTeardown::Closed
    } else {
        SlotTeardown::Failed(failures.join("; "))
    }
}
