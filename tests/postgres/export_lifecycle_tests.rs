//! Export service tests over `PostgreSQL` stores.

use super::helpers::{BoxError, prepared_store};
use export_lifecycle::{
    artifact::adapters::InMemoryArtifactStore,
    config::ExportSettings,
    execution::domain::{ExecutionStatus, OwnerId},
    export::{domain::ExportRequest, services::ExportLifecycleService},
};
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread")]
async fn export_started_over_postgres_is_listed_with_its_task() -> Result<(), BoxError> {
    let Some(ctx) = prepared_store().await? else {
        return Ok(());
    };
    let jobs = Arc::new(ctx.store);
    let service = ExportLifecycleService::new(
        Arc::clone(&jobs),
        Arc::clone(&jobs),
        Arc::new(InMemoryArtifactStore::new()),
        &ExportSettings::default(),
    );

    let execution_id = service
        .start(OwnerId::new(5), ExportRequest::new("weekly", "alice"))
        .await?;
    let listed = service.list_executions("alice").await?;
    let task = service.get_task(execution_id).await?;

    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|status| status.id == execution_id));
    assert!(listed.iter().all(|status| status.status == ExecutionStatus::Pending));
    assert_eq!(task.execution_id(), execution_id);
    assert_eq!(
        task.job().parameters().get("JobId"),
        Some(&serde_json::json!(execution_id.value()))
    );
    Ok(())
}
