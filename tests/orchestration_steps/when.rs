//! When steps for orchestration BDD scenarios.

use super::world::{OrchestrationWorld, run_async};
use rstest_bdd_macros::when;

#[when("the backends are initialised")]
fn initialise_backends(world: &mut OrchestrationWorld) {
    let orchestrator = world.orchestrator();
    world.last_result = Some(run_async(orchestrator.initialize(world.request())));
}

#[when("the initialised backends are torn down")]
fn tear_down_backends(world: &mut OrchestrationWorld) -> Result<(), eyre::Report> {
    let composite = match world.last_result.as_ref() {
        Some(Ok(composite)) => composite.clone(),
        Some(Err(err)) => return Err(eyre::eyre!("initialisation failed: {err}")),
        None => return Err(eyre::eyre!("backends were never initialised")),
    };
    let orchestrator = world.orchestrator();
    world.last_report = Some(run_async(orchestrator.teardown(&composite)));
    Ok(())
}
