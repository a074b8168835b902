//! Configuration-driven initialisation through the public API.

use super::helpers::{Backends, backends, document, full_config_json, request, sample_bag};
use ormgate::orchestration::{
    domain::{BackendKind, ModelBag},
    ports::{BackendPortError, CacheClient, EntitySqlConnection},
    services::OrchestrationError,
};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deserialised_configuration_brings_up_every_backend(backends: Backends) {
    let composite = backends
        .orchestrator()
        .initialize(request(sample_bag(), full_config_json()))
        .await
        .expect("initialisation should succeed");

    assert_eq!(composite.present_kinds(), BackendKind::ALL.to_vec());
    assert_eq!(
        composite.cache().map(|output| output.client().endpoint()),
        Some("cache.internal:6380".to_owned())
    );
    assert_eq!(
        composite
            .entity_sql()
            .map(|output| output.connection().name().to_owned()),
        Some("reporting".to_owned())
    );
    assert_eq!(
        composite
            .document()
            .map(|output| output.collections().keys().cloned().collect::<Vec<_>>()),
        Some(vec!["User".to_owned()])
    );
    assert_eq!(
        backends
            .sync_sql
            .synced_models()
            .expect("sync state should be readable"),
        vec!["Widget".to_owned()]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overridden_omit_list_lets_access_token_through(backends: Backends) {
    let mut config = full_config_json();
    config["omit_models"] = json!([]);

    let composite = backends
        .orchestrator()
        .initialize(request(sample_bag(), config))
        .await
        .expect("initialisation should succeed");

    let collections = composite
        .document()
        .map(|output| output.collections().keys().cloned().collect::<Vec<_>>());
    assert_eq!(
        collections,
        Some(vec!["AccessToken".to_owned(), "User".to_owned()])
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn routes_without_model_marker_contribute_nothing(backends: Backends) {
    let models = ModelBag::from_routes([
        ("api/models", ModelBag::new().with("User", document("user"))),
        ("api/policies", ModelBag::new().with("Policy", document("policy"))),
    ]);
    let config = json!({
        "backends": {
            "document": { "connections": { "primary": { "adapter": "memory" } } }
        }
    });

    let composite = backends
        .orchestrator()
        .initialize(request(models, config))
        .await
        .expect("initialisation should succeed");

    assert_eq!(composite.present_kinds(), vec![BackendKind::Document]);
    assert_eq!(
        composite
            .document()
            .map(|output| output.collections().keys().cloned().collect::<Vec<_>>()),
        Some(vec!["User".to_owned()])
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skipped_blocks_are_never_contacted(backends: Backends) {
    let config = json!({
        "backends": {
            "cache": { "skip": true },
            "sync_sql": { "skip": true, "uri": "postgres://unused" },
            "entity_sql": { "skip": true },
            "document": { "skip": true }
        }
    });

    let composite = backends
        .orchestrator()
        .initialize(request(sample_bag(), config))
        .await
        .expect("initialisation should succeed");

    assert!(composite.is_empty());
    assert!(backends.cache.clients().expect("clients").is_empty());
    assert_eq!(backends.sync_sql.connection_count().expect("count"), 0);
    assert!(backends.entity_sql.connections().expect("connections").is_empty());
    assert_eq!(backends.document.stores_created().expect("stores"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_cache_fails_the_call_and_releases_the_rest(backends: Backends) {
    backends
        .cache
        .fail_open(BackendPortError::unreachable("cache.internal:6380", "refused"))
        .expect("cache script should update");

    let error = backends
        .orchestrator()
        .initialize(request(sample_bag(), full_config_json()))
        .await
        .expect_err("a refused cache should fail initialisation");

    assert!(matches!(
        error,
        OrchestrationError::Connect {
            backend: BackendKind::Cache,
            ..
        }
    ));
    assert_eq!(error.backend(), BackendKind::Cache);
    let entity_connections = backends.entity_sql.connections().expect("connections");
    assert_eq!(entity_connections.len(), 1);
    assert!(
        entity_connections
            .iter()
            .all(|connection| !connection.is_connected())
    );
    assert_eq!(backends.sync_sql.close_count().expect("close count"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn document_store_without_connections_is_a_structural_mismatch(backends: Backends) {
    let config = json!({
        "backends": { "document": { "connections": {} } }
    });

    let error = backends
        .orchestrator()
        .initialize(request(sample_bag(), config))
        .await
        .expect_err("an empty ontology should fail initialisation");

    assert!(matches!(
        error,
        OrchestrationError::StructuralMismatch {
            connections: 0,
            collections: 1,
        }
    ));
}
