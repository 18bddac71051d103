//! Given steps for export lifecycle BDD scenarios.

use super::world::{ExportWorld, run_async};
use eyre::WrapErr;
use export_lifecycle::{
    execution::{
        domain::{ExtraAttributes, NewExecution},
        ports::ExecutionStore,
    },
    export::domain::{ExportRequest, artifact_category, export_vendor_type, repository_name},
};
use rstest_bdd_macros::given;

#[given("an export service with in-memory stores")]
fn in_memory_service(world: &mut ExportWorld) {
    *world = ExportWorld::new(None);
}

#[given(r#"an export service whose task store fails with "{message}""#)]
fn failing_task_store(world: &mut ExportWorld, message: String) {
    *world = ExportWorld::new(Some(message));
}

#[given(r#"user "{user_name}" has started export job "{job_name}""#)]
fn export_started(
    world: &mut ExportWorld,
    user_name: String,
    job_name: String,
) -> Result<(), eyre::Report> {
    let execution_id = run_async(
        world
            .service
            .start(world.owner, ExportRequest::new(job_name, user_name)),
    )
    .wrap_err("start export in scenario setup")?;
    world.last_execution = Some(execution_id);
    Ok(())
}

#[given("an export execution without tasks")]
fn execution_without_tasks(world: &mut ExportWorld) -> Result<(), eyre::Report> {
    let new_execution =
        NewExecution::manual(export_vendor_type(), world.owner, ExtraAttributes::new());
    let execution_id = run_async(world.jobs.create(&new_execution))
        .wrap_err("create bare export execution")?;
    world.last_execution = Some(execution_id);
    Ok(())
}

#[given("the export artifact has been uploaded")]
fn artifact_uploaded(world: &mut ExportWorld) -> Result<(), eyre::Report> {
    let execution_id = world
        .last_execution
        .ok_or_else(|| eyre::eyre!("missing started export in scenario world"))?;
    let artifact = world
        .artifacts
        .put(
            &artifact_category(),
            &repository_name(execution_id),
            "project,repository,cve\n",
        )
        .wrap_err("upload export artifact")?;
    run_async(world.jobs.update_extra_attributes(
        execution_id,
        &ExtraAttributes::new().with_digest(artifact.digest()),
    ))
    .wrap_err("record export digest")?;
    Ok(())
}
