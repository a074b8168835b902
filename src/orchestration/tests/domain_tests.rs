//! Unit tests for orchestration domain types.

use super::fixtures::sql_factory;
use crate::orchestration::domain::{
    BackendConfigs, BackendHandle, BackendKind, BackendSettings, CacheConfig,
    CollectionDefinition, DEFAULT_ENTITY_CONNECTION, DEFAULT_OMITTED_MODEL, EntityColumn,
    EntitySchema, EntitySqlConfig, ModelBag, ModelDefinition, OrchestrationDomainError,
    OrchestratorConfig, ParseBackendKindError, SqlAttribute, SqlModel,
};
use rstest::rstest;
use serde_json::{Map, json};

#[rstest]
#[case("cache", BackendKind::Cache)]
#[case("sync_sql", BackendKind::SyncSql)]
#[case("Entity-SQL", BackendKind::EntitySql)]
#[case("  document ", BackendKind::Document)]
fn backend_kind_parses_configuration_keys(#[case] raw: &str, #[case] expected: BackendKind) {
    assert_eq!(BackendKind::try_from(raw), Ok(expected));
}

#[rstest]
fn backend_kind_rejects_unknown_keys() {
    assert_eq!(
        BackendKind::try_from("graph"),
        Err(ParseBackendKindError("graph".to_owned()))
    );
}

#[rstest]
fn only_cache_owns_no_models() {
    let owners: Vec<BackendKind> = BackendKind::ALL
        .into_iter()
        .filter(|kind| kind.owns_models())
        .collect();

    assert_eq!(
        owners,
        vec![
            BackendKind::SyncSql,
            BackendKind::EntitySql,
            BackendKind::Document
        ]
    );
}

#[rstest]
fn sql_model_renders_create_table_statement() {
    let model = SqlModel::new("Widget")
        .and_then(|model| model.with_table("widgets"))
        .and_then(|model| model.with_attribute(SqlAttribute::new("id", "BIGINT").primary_key()))
        .and_then(|model| model.with_attribute(SqlAttribute::new("label", "TEXT")))
        .and_then(|model| model.with_attribute(SqlAttribute::new("sku", "TEXT").not_null()))
        .expect("model should be valid");

    assert_eq!(
        model.create_table_sql(),
        concat!(
            r#"CREATE TABLE IF NOT EXISTS "widgets" ("#,
            r#""id" BIGINT NOT NULL, "label" TEXT, "sku" TEXT NOT NULL, "#,
            r#"PRIMARY KEY ("id"))"#
        )
    );
}

#[rstest]
fn sql_model_quotes_embedded_quotes() {
    let model = SqlModel::new(r#"odd"name"#).expect("model should be valid");

    assert_eq!(
        model.create_table_sql(),
        r#"CREATE TABLE IF NOT EXISTS "odd""name" ()"#
    );
}

#[rstest]
fn sql_model_rejects_duplicate_attributes() {
    let result = SqlModel::new("Widget")
        .and_then(|model| model.with_attribute(SqlAttribute::new("id", "BIGINT")))
        .and_then(|model| model.with_attribute(SqlAttribute::new("id", "TEXT")));

    assert_eq!(
        result,
        Err(OrchestrationDomainError::DuplicateAttribute {
            model: "Widget".to_owned(),
            attribute: "id".to_owned(),
        })
    );
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_model_names_are_rejected(#[case] name: &str) {
    assert_eq!(SqlModel::new(name), Err(OrchestrationDomainError::EmptyModelName));
    assert_eq!(
        EntitySchema::new(name),
        Err(OrchestrationDomainError::EmptyModelName)
    );
}

#[rstest]
fn entity_schema_table_falls_back_to_class_name() {
    let schema = EntitySchema::new("Invoice")
        .and_then(|schema| schema.with_column(EntityColumn::primary("id", "uuid")))
        .expect("schema should be valid");

    assert_eq!(schema.table(), "Invoice");
    assert_eq!(schema.clone().with_table("invoices").table(), "invoices");
    assert!(schema.columns().iter().all(EntityColumn::is_primary));
}

#[rstest]
fn model_bag_replaces_existing_names_in_place() {
    let mut bag = ModelBag::new()
        .with("User", ModelDefinition::function("User"))
        .with("Widget", ModelDefinition::function("Widget"));
    bag.insert("User", ModelDefinition::function("UserV2"));
    bag.insert_null("Legacy");

    let names: Vec<&str> = bag.iter().map(|entry| entry.name()).collect();
    assert_eq!(names, vec!["User", "Widget", "Legacy"]);
    assert_eq!(bag.len(), 3);
    assert!(bag.get("Legacy").is_none());
    assert!(matches!(
        bag.get("User").map(|definition| definition.body()),
        Some(crate::orchestration::domain::ModelBody::Function(name)) if name == "UserV2"
    ));
}

#[rstest]
fn model_bag_from_routes_keeps_only_model_routes() {
    let routes = vec![
        (
            "api/models",
            ModelBag::new().with("User", ModelDefinition::function("first")),
        ),
        (
            "api/controllers",
            ModelBag::new().with("Controller", ModelDefinition::function("controller")),
        ),
        (
            "admin/models",
            ModelBag::new().with("User", ModelDefinition::function("second")),
        ),
    ];

    let bag = ModelBag::from_routes(routes);

    let names: Vec<&str> = bag.iter().map(|entry| entry.name()).collect();
    assert_eq!(names, vec!["User"]);
    assert!(matches!(
        bag.get("User").map(|definition| definition.body()),
        Some(crate::orchestration::domain::ModelBody::Function(name)) if name == "second"
    ));
}

#[rstest]
#[case(ModelDefinition::attributes(Map::new()).with_identity("Account"), "account")]
#[case(ModelDefinition::attributes(Map::new()).with_table_name("people"), "person")]
fn collection_identity_prefers_marker(#[case] model: ModelDefinition, #[case] expected: &str) {
    let collection = CollectionDefinition::from_model("Person", &model);

    assert_eq!(collection.name(), "Person");
    assert_eq!(collection.identity(), expected);
}

#[rstest]
fn backend_settings_default_skip_to_false() {
    let configs: BackendConfigs = serde_json::from_value(json!({
        "cache": { "host": "cache.local" },
        "sync_sql": { "skip": true, "uri": "postgres://db/app" },
        "entity_sql": { "name": "reporting" }
    }))
    .expect("configuration should deserialise");

    let cache = configs.cache.as_ref().expect("cache block should be present");
    assert!(!cache.skip);
    assert_eq!(cache.options.endpoint(), "cache.local:6379");
    assert!(configs.is_active(BackendKind::Cache));
    assert!(!configs.is_active(BackendKind::SyncSql));
    assert!(configs.is_active(BackendKind::EntitySql));
    assert!(!configs.is_active(BackendKind::Document));
    assert_eq!(
        configs
            .entity_sql
            .as_ref()
            .map(|settings| settings.options.connection_name()),
        Some("reporting")
    );
}

#[rstest]
fn cache_alone_does_not_require_models() {
    let configs = BackendConfigs {
        cache: Some(BackendSettings::enabled(CacheConfig::default())),
        ..BackendConfigs::default()
    };

    assert!(!configs.requires_models());
}

#[rstest]
fn orchestrator_config_omits_access_token_by_default() {
    let config: OrchestratorConfig =
        serde_json::from_value(json!({})).expect("configuration should deserialise");

    assert_eq!(config.omit_models, vec![DEFAULT_OMITTED_MODEL.to_owned()]);
    assert_eq!(
        OrchestratorConfig::default()
            .with_omit_models(Vec::<String>::new())
            .omit_models,
        Vec::<String>::new()
    );
}

#[rstest]
fn skipped_handle_hides_config_and_models() {
    let skipped = BackendHandle::new(true, CacheConfig::default(), vec!["User"]);
    let active = BackendHandle::new(false, CacheConfig::default(), vec!["User"]);

    assert!(skipped.is_skipped());
    assert!(skipped.into_active().is_none());
    let (config, models) = active
        .into_active()
        .expect("active handle should yield its contents")
        .into_parts();
    assert_eq!(config, CacheConfig::default());
    assert_eq!(models, vec!["User"]);
}

#[rstest]
#[case(ModelDefinition::function("User"), true)]
#[case(sql_factory(&[]), true)]
#[case(
    ModelDefinition::entity_class(EntitySchema::new("Invoice").expect("schema should be valid")),
    true
)]
#[case(ModelDefinition::attributes(Map::new()), false)]
fn only_attribute_bodies_are_not_invocable(
    #[case] definition: ModelDefinition,
    #[case] expected: bool,
) {
    assert_eq!(definition.body().is_invocable(), expected);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn blank_entity_connection_name_falls_back_to_default(#[case] name: Option<&str>) {
    let config = EntitySqlConfig {
        name: name.map(str::to_owned),
        ..EntitySqlConfig::default()
    };

    assert_eq!(config.connection_name(), DEFAULT_ENTITY_CONNECTION);
}

#[rstest]
fn entity_connection_name_is_trimmed() {
    let config: EntitySqlConfig = serde_json::from_value(json!({ "name": " reporting " }))
        .expect("configuration should deserialise");

    assert_eq!(config.connection_name(), "reporting");
}
