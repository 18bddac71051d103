//! End-to-end export lifecycle tests against in-memory stores.

use super::helpers::{ExportHarness, harness, owner};
use export_lifecycle::{
    execution::{
        domain::{ExecutionId, ExecutionStatus, ExtraAttributes, TaskStatus},
        ports::ExecutionStore,
    },
    export::{
        domain::{ExportRequest, artifact_category, repository_name},
        services::ExportLifecycleError,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn started_export_is_visible_to_its_requester(
    harness: ExportHarness,
) -> Result<(), eyre::Report> {
    let execution_id = harness
        .service
        .start(owner(), ExportRequest::new("weekly", "alice").with_projects([3]))
        .await?;

    let status = harness
        .service
        .get_execution(execution_id)
        .await?
        .ok_or_else(|| eyre::eyre!("started export {execution_id} is missing"))?;
    let listed = harness.service.list_executions("alice").await?;

    eyre::ensure!(status.id.value() == 1, "first export should get id 1");
    eyre::ensure!(status.owner_id == owner(), "owner should be preserved");
    eyre::ensure!(status.job_name == "weekly", "job name should be preserved");
    eyre::ensure!(!status.file_present, "no artifact exists yet");
    eyre::ensure!(listed == vec![status], "listing should return the export");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_scoped_to_the_user(harness: ExportHarness) -> Result<(), eyre::Report> {
    let alice = harness
        .service
        .start(owner(), ExportRequest::new("weekly", "alice"))
        .await?;
    let bob = harness
        .service
        .start(owner(), ExportRequest::new("weekly", "bob"))
        .await?;

    let for_alice: Vec<ExecutionId> = harness
        .service
        .list_executions("alice")
        .await?
        .into_iter()
        .map(|status| status.id)
        .collect();
    let for_bob: Vec<ExecutionId> = harness
        .service
        .list_executions("bob")
        .await?
        .into_iter()
        .map(|status| status.id)
        .collect();

    assert_eq!(for_alice, vec![alice]);
    assert_eq!(for_bob, vec![bob]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finished_export_can_be_deleted(harness: ExportHarness) -> Result<(), eyre::Report> {
    let execution_id = harness
        .service
        .start(owner(), ExportRequest::new("weekly", "alice"))
        .await?;
    let task = harness.service.get_task(execution_id).await?;
    harness
        .jobs
        .record_task_status(task.id(), TaskStatus::Success, "")?;

    harness.service.delete_execution(execution_id).await?;

    eyre::ensure!(
        harness.service.get_execution(execution_id).await?.is_none(),
        "deleted export should be absent"
    );
    let task_lookup = harness.service.get_task(execution_id).await;
    eyre::ensure!(
        matches!(task_lookup, Err(ExportLifecycleError::TaskNotFound(id)) if id == execution_id),
        "deleted export should have no task, got {task_lookup:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn artifact_upload_flips_file_presence(
    harness: ExportHarness,
) -> Result<(), eyre::Report> {
    let execution_id = harness
        .service
        .start(owner(), ExportRequest::new("weekly", "alice"))
        .await?;
    let task = harness.service.get_task(execution_id).await?;
    let artifact = harness.artifacts.put(
        &artifact_category(),
        &repository_name(execution_id),
        "project,repository,cve\n",
    )?;
    harness
        .jobs
        .update_extra_attributes(
            execution_id,
            &ExtraAttributes::new().with_digest(artifact.digest()),
        )
        .await?;
    harness
        .jobs
        .record_task_status(task.id(), TaskStatus::Success, "")?;

    let status = harness
        .service
        .get_execution(execution_id)
        .await?
        .ok_or_else(|| eyre::eyre!("export {execution_id} is missing"))?;

    eyre::ensure!(status.status == ExecutionStatus::Success, "export should be finished");
    eyre::ensure!(status.file_present, "artifact should be reported present");
    eyre::ensure!(
        status.export_data_digest == artifact.digest(),
        "digest should be projected"
    );
    Ok(())
}
