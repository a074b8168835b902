//! Given steps for orchestration BDD scenarios.

use super::world::{OrchestrationWorld, every_backend_active, primary_document_config};
use eyre::WrapErr;
use ormgate::orchestration::{
    adapters::memory::OntologyDefect,
    domain::{
        BackendConfigs, BackendSettings, EntityColumn, EntitySchema, ModelDefinition,
        OrchestrationDomainError, RealizeContext, SqlAttribute, SqlModel,
    },
    ports::BackendPortError,
};
use rstest_bdd_macros::given;
use serde_json::{Map, json};

#[given(r#"a document model "{name}" with table "{table}""#)]
fn a_document_model(world: &mut OrchestrationWorld, name: String, table: String) {
    let mut attributes = Map::new();
    attributes.insert("id".to_owned(), json!({ "type": "string" }));
    world.models.insert(
        name,
        ModelDefinition::attributes(attributes).with_table_name(table),
    );
}

#[given(r#"a plain function model "{name}""#)]
fn a_plain_function_model(world: &mut OrchestrationWorld, name: String) {
    let function = format!("build{name}");
    world.models.insert(name, ModelDefinition::function(function));
}

#[given(r#"a sync model "{name}""#)]
fn a_sync_model(world: &mut OrchestrationWorld, name: String) {
    world.models.insert(
        name,
        ModelDefinition::sync_factory(
            |context: &RealizeContext<'_>| -> Result<SqlModel, OrchestrationDomainError> {
                SqlModel::new(context.model_name())?
                    .with_attribute(SqlAttribute::new("id", "BIGINT").primary_key())
            },
        ),
    );
}

#[given(r#"an entity model "{name}""#)]
fn an_entity_model(world: &mut OrchestrationWorld, name: String) -> Result<(), eyre::Report> {
    let schema = EntitySchema::new(name.as_str())
        .and_then(|schema| schema.with_column(EntityColumn::primary("id", "uuid")))
        .wrap_err("build entity schema for scenario")?;
    world
        .models
        .insert(name, ModelDefinition::entity_class(schema));
    Ok(())
}

#[given("only the document store is active")]
fn only_document_store_active(world: &mut OrchestrationWorld) {
    world.backends = BackendConfigs {
        cache: Some(BackendSettings::skipped()),
        sync_sql: Some(BackendSettings::skipped()),
        entity_sql: Some(BackendSettings::skipped()),
        document: Some(BackendSettings::enabled(primary_document_config())),
    };
}

#[given("every backend is active")]
fn every_backend_is_active(world: &mut OrchestrationWorld) {
    world.backends = every_backend_active();
}

#[given("every backend is skipped")]
fn every_backend_is_skipped(world: &mut OrchestrationWorld) {
    world.backends = BackendConfigs {
        cache: Some(BackendSettings::skipped()),
        sync_sql: Some(BackendSettings::skipped()),
        entity_sql: Some(BackendSettings::skipped()),
        document: Some(BackendSettings::skipped()),
    };
}

#[given("the entity backend refuses connections")]
fn entity_backend_refuses(world: &mut OrchestrationWorld) -> Result<(), eyre::Report> {
    world
        .entity_sql
        .fail_connect(BackendPortError::unreachable("db.internal:5432", "refused"))
        .wrap_err("script entity connect failure")
}

#[given("the sync connection fails to close")]
fn sync_connection_fails_to_close(world: &mut OrchestrationWorld) -> Result<(), eyre::Report> {
    world
        .sync_sql
        .fail_close(BackendPortError::Rejected("pool busy".to_owned()))
        .wrap_err("script sync close failure")
}

#[given("the document store reports no connections")]
fn document_store_reports_no_connections(
    world: &mut OrchestrationWorld,
) -> Result<(), eyre::Report> {
    world
        .document
        .with_defect(OntologyDefect::MissingConnections)
        .wrap_err("script document ontology defect")
}
