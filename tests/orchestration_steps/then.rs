//! Then steps for orchestration BDD scenarios.

use super::world::OrchestrationWorld;
use ormgate::orchestration::{
    domain::BackendKind,
    services::{CompositeResult, OrchestrationError, SlotTeardown, TeardownReport},
};
use rstest_bdd_macros::then;

fn composite(world: &OrchestrationWorld) -> Result<&CompositeResult, eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(composite)) => Ok(composite),
        Some(Err(err)) => Err(eyre::eyre!("expected success, got {err}")),
        None => Err(eyre::eyre!("backends were never initialised")),
    }
}

fn failure(world: &OrchestrationWorld) -> Result<&OrchestrationError, eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(err)) => Ok(err),
        Some(Ok(composite)) => Err(eyre::eyre!("expected failure, got {composite:?}")),
        None => Err(eyre::eyre!("backends were never initialised")),
    }
}

fn report(world: &OrchestrationWorld) -> Result<&TeardownReport, eyre::Report> {
    world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("backends were never torn down"))
}

#[then("initialisation succeeds")]
fn initialisation_succeeds(world: &OrchestrationWorld) -> Result<(), eyre::Report> {
    composite(world).map(|_| ())
}

#[then(r#"only the "{backend}" backend holds a result"#)]
fn only_backend_holds_result(
    world: &OrchestrationWorld,
    backend: String,
) -> Result<(), eyre::Report> {
    let expected = BackendKind::try_from(backend.as_str())?;
    let present = composite(world)?.present_kinds();
    if present != vec![expected] {
        return Err(eyre::eyre!("expected only {expected}, found {present:?}"));
    }
    Ok(())
}

#[then("no backend holds a result")]
fn no_backend_holds_result(world: &OrchestrationWorld) -> Result<(), eyre::Report> {
    let result = composite(world)?;
    if !result.is_empty() {
        return Err(eyre::eyre!("expected an empty result, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the document collections are "{names}""#)]
fn document_collections_are(world: &OrchestrationWorld, names: String) -> Result<(), eyre::Report> {
    let expected: Vec<String> = names.split(',').map(|name| name.trim().to_owned()).collect();
    let actual: Vec<String> = composite(world)?
        .document()
        .ok_or_else(|| eyre::eyre!("document slot is empty"))?
        .collections()
        .keys()
        .cloned()
        .collect();
    if actual != expected {
        return Err(eyre::eyre!("expected collections {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"initialisation fails for the "{backend}" backend"#)]
fn initialisation_fails_for(
    world: &OrchestrationWorld,
    backend: String,
) -> Result<(), eyre::Report> {
    let expected = BackendKind::try_from(backend.as_str())?;
    let err = failure(world)?;
    if err.backend() != expected {
        return Err(eyre::eyre!("expected a {expected} failure, got {err}"));
    }
    Ok(())
}

#[then("initialisation fails with a structural mismatch")]
fn initialisation_fails_with_structural_mismatch(
    world: &OrchestrationWorld,
) -> Result<(), eyre::Report> {
    let err = failure(world)?;
    if !matches!(err, OrchestrationError::StructuralMismatch { .. }) {
        return Err(eyre::eyre!("expected a structural mismatch, got {err}"));
    }
    Ok(())
}

#[then("the sync connection was closed {count:usize} time")]
fn sync_connection_closed(world: &OrchestrationWorld, count: usize) -> Result<(), eyre::Report> {
    let closed = world
        .sync_sql
        .close_count()
        .map_err(|err| eyre::eyre!("read sync close count: {err}"))?;
    if closed != count {
        return Err(eyre::eyre!("expected {count} close(s), found {closed}"));
    }
    Ok(())
}

#[then(r#"the "{backend}" teardown failed"#)]
fn teardown_failed(world: &OrchestrationWorld, backend: String) -> Result<(), eyre::Report> {
    let kind = BackendKind::try_from(backend.as_str())?;
    let outcome = report(world)?.slot(kind);
    if !outcome.is_failed() {
        return Err(eyre::eyre!("expected {kind} teardown to fail, got {outcome:?}"));
    }
    Ok(())
}

#[then("every other backend was released")]
fn every_other_backend_released(world: &OrchestrationWorld) -> Result<(), eyre::Report> {
    let report = report(world)?;
    let failed = report.failures();
    if failed.len() != 1 {
        return Err(eyre::eyre!("expected exactly one failure, found {failed:?}"));
    }
    for kind in BackendKind::ALL {
        let outcome = report.slot(kind);
        if !outcome.is_failed() && outcome != &SlotTeardown::Closed {
            return Err(eyre::eyre!("expected {kind} to be closed, got {outcome:?}"));
        }
    }
    Ok(())
}
