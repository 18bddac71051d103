//! Then steps for export lifecycle BDD scenarios.

use super::world::{ExportWorld, run_async};
use eyre::WrapErr;
use export_lifecycle::{
    execution::{domain::ExecutionStatus, ports::TaskStoreError},
    export::{domain::ExportStatus, services::ExportLifecycleError},
};
use rstest_bdd_macros::then;

fn current_status(world: &ExportWorld) -> Result<ExportStatus, eyre::Report> {
    if let Some(status) = &world.last_status {
        return Ok(status.clone());
    }
    let execution_id = world
        .last_execution
        .ok_or_else(|| eyre::eyre!("missing execution in scenario world"))?;
    run_async(world.service.get_execution(execution_id))
        .wrap_err("fetch export status")?
        .ok_or_else(|| eyre::eyre!("export {execution_id} is missing"))
}

#[then(r#"the export status has job name "{job_name}" and user name "{user_name}""#)]
fn status_has_names(
    world: &ExportWorld,
    job_name: String,
    user_name: String,
) -> Result<(), eyre::Report> {
    let status = current_status(world)?;
    if status.job_name != job_name || status.user_name != user_name {
        return Err(eyre::eyre!(
            "expected job {job_name} for {user_name}, found job {} for {}",
            status.job_name,
            status.user_name
        ));
    }
    if status.owner_id != world.owner {
        return Err(eyre::eyre!("expected owner {}, found {}", world.owner, status.owner_id));
    }
    Ok(())
}

#[then("the export file is not present")]
fn file_not_present(world: &ExportWorld) -> Result<(), eyre::Report> {
    if current_status(world)?.file_present {
        return Err(eyre::eyre!("export file unexpectedly reported present"));
    }
    Ok(())
}

#[then("the export file is present")]
fn file_present(world: &ExportWorld) -> Result<(), eyre::Report> {
    if !current_status(world)?.file_present {
        return Err(eyre::eyre!("export file reported absent"));
    }
    Ok(())
}

#[then("starting the export fails with a task store error")]
fn start_fails_with_task_store_error(world: &ExportWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_start_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing start result"))?;

    if !matches!(
        result,
        Err(ExportLifecycleError::TaskStore(TaskStoreError::Persistence(_)))
    ) {
        return Err(eyre::eyre!("expected task store error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the latest export of "{user_name}" has status "{status}" with message "{message}""#)]
fn latest_export_has_status(
    world: &ExportWorld,
    user_name: String,
    status: String,
    message: String,
) -> Result<(), eyre::Report> {
    let expected = ExecutionStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let listing = run_async(world.service.list_executions(&user_name))
        .wrap_err("list exports for user")?;
    let latest = listing
        .last()
        .ok_or_else(|| eyre::eyre!("no export found for {user_name}"))?;

    if latest.status != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            latest.status
        ));
    }
    if latest.status_message != message {
        return Err(eyre::eyre!(
            "expected status message {message:?}, found {:?}",
            latest.status_message
        ));
    }
    Ok(())
}

#[then(r#"only exports requested by "{user_name}" are listed"#)]
fn only_user_exports_listed(world: &ExportWorld, user_name: String) -> Result<(), eyre::Report> {
    if world.last_listing.is_empty() {
        return Err(eyre::eyre!("expected at least one export for {user_name}"));
    }
    if let Some(other) = world
        .last_listing
        .iter()
        .find(|status| status.user_name != user_name)
    {
        return Err(eyre::eyre!(
            "export {} belongs to {}, not {user_name}",
            other.id,
            other.user_name
        ));
    }
    Ok(())
}

#[then("fetching the task fails naming the execution")]
fn task_fetch_fails(world: &ExportWorld) -> Result<(), eyre::Report> {
    let execution_id = world
        .last_execution
        .ok_or_else(|| eyre::eyre!("missing execution in scenario world"))?;
    let result = world
        .last_task_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task result"))?;

    let Err(err) = result else {
        return Err(eyre::eyre!("expected task lookup to fail, got {result:?}"));
    };
    if !matches!(err, ExportLifecycleError::TaskNotFound(id) if *id == execution_id) {
        return Err(eyre::eyre!("expected TaskNotFound error, got {err:?}"));
    }
    if !err.to_string().contains(&execution_id.to_string()) {
        return Err(eyre::eyre!("error {err} does not name execution {execution_id}"));
    }
    Ok(())
}
