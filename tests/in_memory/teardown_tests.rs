//! Releasing initialised backends through the public API.

use super::helpers::{Backends, backends, full_config_json, request, sample_bag};
use ormgate::orchestration::{
    domain::BackendKind,
    services::{CompositeResult, SlotTeardown},
};
use rstest::rstest;

async fn bring_up(backends: &Backends) -> CompositeResult {
    backends
        .orchestrator()
        .initialize(request(sample_bag(), full_config_json()))
        .await
        .expect("initialisation should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn teardown_after_initialisation_is_clean(backends: Backends) {
    let orchestrator = backends.orchestrator();
    let composite = bring_up(&backends).await;

    let report = orchestrator.teardown(&composite).await;

    assert!(report.is_clean());
    for kind in BackendKind::ALL {
        assert_eq!(report.slot(kind), &SlotTeardown::Closed);
    }
    let adapter = backends
        .document
        .adapter("memory")
        .expect("adapter lookup should succeed")
        .expect("adapter should exist after initialisation");
    assert_eq!(adapter.torn_down(), vec!["primary".to_owned()]);
    assert!(
        adapter
            .registry()
            .is_some_and(|registry| !registry.contains("primary"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_teardown_sees_entity_connection_already_closed(backends: Backends) {
    let orchestrator = backends.orchestrator();
    let composite = bring_up(&backends).await;

    let first = orchestrator.teardown(&composite).await;
    let second = orchestrator.teardown(&composite).await;

    assert!(first.is_clean());
    assert_eq!(
        second.slot(BackendKind::EntitySql),
        &SlotTeardown::AlreadyClosed
    );
    assert!(second.is_clean());
    let closes: usize = backends
        .entity_sql
        .connections()
        .expect("connections")
        .iter()
        .map(|connection| connection.close_calls())
        .sum();
    assert_eq!(closes, 1);
}
