//! Execution and task persistence tests against `PostgreSQL`.

use super::helpers::{BoxError, prepared_store};
use export_lifecycle::execution::{
    domain::{
        ExecutionId, ExecutionQuery, ExecutionStatus, ExtraAttributeKey, ExtraAttributes,
        IdOrder, JobSpec, NewExecution, OwnerId, TaskQuery, TaskStatus, VendorType,
    },
    ports::{ExecutionStore, ExecutionStoreError, TaskStore, TaskStoreError},
};
use serde_json::{Map, json};
use std::time::Duration;

fn export_kind() -> VendorType {
    VendorType::from_static("SCAN_DATA_EXPORT")
}

fn export_job() -> JobSpec {
    let mut parameters = Map::new();
    parameters.insert("mode".to_owned(), json!("export"));
    JobSpec::generic(export_kind(), parameters)
}

fn new_execution(user_name: &str) -> NewExecution {
    NewExecution::manual(
        export_kind(),
        OwnerId::new(3),
        ExtraAttributes::new()
            .with_job_name("weekly")
            .with_user_name(user_name),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn created_execution_round_trips_through_the_database() -> Result<(), BoxError> {
    let Some(ctx) = prepared_store().await? else {
        return Ok(());
    };

    let id = ExecutionStore::create(&ctx.store, &new_execution("alice")).await?;
    let stored = ctx
        .store
        .get(id)
        .await?
        .ok_or_else(|| format!("execution {id} missing"))?;

    assert_eq!(stored.id(), id);
    assert_eq!(stored.vendor_type(), &export_kind());
    assert_eq!(stored.owner_id(), OwnerId::new(3));
    assert_eq!(stored.status(), ExecutionStatus::Pending);
    assert_eq!(stored.extra_attributes().job_name.as_deref(), Some("weekly"));
    assert_eq!(stored.end_time(), None);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_filters_on_user_name_attribute() -> Result<(), BoxError> {
    let Some(ctx) = prepared_store().await? else {
        return Ok(());
    };
    let alice = ExecutionStore::create(&ctx.store, &new_execution("alice")).await?;
    ExecutionStore::create(&ctx.store, &new_execution("bob")).await?;

    let query = ExecutionQuery::new()
        .with_vendor_type(export_kind())
        .with_attribute(ExtraAttributeKey::UserName, "alice");
    let ids: Vec<ExecutionId> = ExecutionStore::list(&ctx.store, &query)
        .await?
        .iter()
        .map(|execution| execution.id())
        .collect();

    assert_eq!(ids, vec![alice]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn task_creation_requires_existing_execution() -> Result<(), BoxError> {
    let Some(ctx) = prepared_store().await? else {
        return Ok(());
    };
    let missing = ExecutionId::new(9_999)?;

    let result = TaskStore::create(&ctx.store, missing, &export_job()).await;

    assert!(matches!(result, Err(TaskStoreError::ExecutionNotFound(id)) if id == missing));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tasks_list_newest_first_when_requested() -> Result<(), BoxError> {
    let Some(ctx) = prepared_store().await? else {
        return Ok(());
    };
    let execution_id = ExecutionStore::create(&ctx.store, &new_execution("alice")).await?;
    let older = TaskStore::create(&ctx.store, execution_id, &export_job()).await?;
    let newer = TaskStore::create(&ctx.store, execution_id, &export_job()).await?;

    let query = TaskQuery::new()
        .with_vendor_type(export_kind())
        .with_execution_id(execution_id)
        .ordered(IdOrder::Descending);
    let tasks = TaskStore::list(&ctx.store, &query).await?;

    let ids: Vec<_> = tasks.iter().map(|task| task.id()).collect();
    assert_eq!(ids, vec![newer, older]);
    assert!(tasks.iter().all(|task| task.job() == &export_job()));
    assert!(tasks.iter().all(|task| task.status() == TaskStatus::Pending));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_then_delete_removes_execution_and_tasks() -> Result<(), BoxError> {
    let Some(ctx) = prepared_store().await? else {
        return Ok(());
    };
    let execution_id = ExecutionStore::create(&ctx.store, &new_execution("alice")).await?;
    TaskStore::create(&ctx.store, execution_id, &export_job()).await?;

    let conflict = ctx.store.delete(execution_id).await;
    assert!(matches!(conflict, Err(ExecutionStoreError::Conflict(id)) if id == execution_id));

    ctx.store
        .stop_and_wait(execution_id, Duration::from_secs(5))
        .await?;
    let stopped = ctx
        .store
        .get(execution_id)
        .await?
        .ok_or_else(|| format!("execution {execution_id} missing"))?;
    assert_eq!(stopped.status(), ExecutionStatus::Stopped);

    ctx.store.delete(execution_id).await?;
    assert!(ctx.store.get(execution_id).await?.is_none());
    let tasks = TaskStore::list(&ctx.store, &TaskQuery::new().with_execution_id(execution_id)).await?;
    assert!(tasks.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn mark_error_and_attribute_updates_persist() -> Result<(), BoxError> {
    let Some(ctx) = prepared_store().await? else {
        return Ok(());
    };
    let execution_id = ExecutionStore::create(&ctx.store, &new_execution("alice")).await?;

    ctx.store
        .update_extra_attributes(execution_id, &ExtraAttributes::new().with_digest("sha256:abc"))
        .await?;
    ctx.store.mark_error(execution_id, "disk full").await?;

    let stored = ctx
        .store
        .get(execution_id)
        .await?
        .ok_or_else(|| format!("execution {execution_id} missing"))?;
    assert_eq!(stored.status(), ExecutionStatus::Error);
    assert_eq!(stored.status_message(), "disk full");
    assert!(stored.end_time().is_some());
    assert_eq!(
        stored.extra_attributes(),
        &ExtraAttributes::new()
            .with_job_name("weekly")
            .with_user_name("alice")
            .with_digest("sha256:abc")
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn operations_on_unknown_execution_report_not_found() -> Result<(), BoxError> {
    let Some(ctx) = prepared_store().await? else {
        return Ok(());
    };
    let missing = ExecutionId::new(4_242)?;

    assert!(ctx.store.get(missing).await?.is_none());
    assert!(matches!(
        ctx.store.delete(missing).await,
        Err(ExecutionStoreError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        ctx.store.mark_error(missing, "gone").await,
        Err(ExecutionStoreError::NotFound(id)) if id == missing
    ));
    Ok(())
}
