//! Runner-reported task progress as observed through the export service.

use super::helpers::{ExportHarness, harness, owner};
use export_lifecycle::{
    execution::{
        domain::{ExecutionStatus, TaskStatus},
        ports::TaskStore,
    },
    export::domain::ExportRequest,
};
use rstest::rstest;

#[rstest]
#[case(TaskStatus::Running, ExecutionStatus::Running, false)]
#[case(TaskStatus::Error, ExecutionStatus::Error, true)]
#[case(TaskStatus::Success, ExecutionStatus::Success, true)]
#[tokio::test(flavor = "multi_thread")]
async fn export_status_follows_its_task(
    harness: ExportHarness,
    #[case] reported: TaskStatus,
    #[case] expected: ExecutionStatus,
    #[case] finished: bool,
) -> Result<(), eyre::Report> {
    let execution_id = harness
        .service
        .start(owner(), ExportRequest::new("weekly", "alice"))
        .await?;
    let task = harness.service.get_task(execution_id).await?;

    harness
        .jobs
        .record_task_status(task.id(), reported, "reported by runner")?;

    let status = harness
        .service
        .get_execution(execution_id)
        .await?
        .ok_or_else(|| eyre::eyre!("export {execution_id} is missing"))?;
    eyre::ensure!(
        status.status == expected,
        "expected {expected}, found {}",
        status.status
    );
    eyre::ensure!(
        status.end_time.is_some() == finished,
        "end time presence should match finished={finished}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retried_task_becomes_the_one_returned(
    harness: ExportHarness,
) -> Result<(), eyre::Report> {
    let execution_id = harness
        .service
        .start(owner(), ExportRequest::new("weekly", "alice"))
        .await?;
    let first = harness.service.get_task(execution_id).await?;
    harness
        .jobs
        .record_task_status(first.id(), TaskStatus::Error, "runner crashed")?;

    let retry = harness.jobs.create(execution_id, first.job()).await?;
    let latest = harness.service.get_task(execution_id).await?;

    eyre::ensure!(latest.id() == retry, "newest task should be returned");
    eyre::ensure!(
        latest.status() == TaskStatus::Pending,
        "retried task should start pending"
    );
    Ok(())
}
