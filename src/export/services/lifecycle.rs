//! Service layer for export execution lifecycle control.

use super::{Compensator, StatusProjector};
use crate::artifact::ports::ArtifactStore;
use crate::config::ExportSettings;
use crate::execution::{
    domain::{
        ExecutionId, ExecutionQuery, ExtraAttributeKey, ExtraAttributes, IdOrder, NewExecution,
        OwnerId, Task, TaskQuery,
    },
    ports::{ExecutionStore, ExecutionStoreError, TaskStore, TaskStoreError},
    services::ExecutionSweeper,
};
use crate::export::domain::{
    ExportRequest, ExportStatus, JobMode, export_job_spec, export_vendor_type,
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for export lifecycle operations.
#[derive(Debug, Error)]
pub enum ExportLifecycleError {
    /// Execution store operation failed.
    #[error(transparent)]
    ExecutionStore(#[from] ExecutionStoreError),
    /// Task store operation failed.
    #[error(transparent)]
    TaskStore(#[from] TaskStoreError),
    /// No task exists for the execution.
    #[error("no task found for execution {0}")]
    TaskNotFound(ExecutionId),
    /// The export request could not be encoded as a task payload.
    #[error("failed to encode export request: {0}")]
    Parameters(#[source] serde_json::Error),
}

/// Result type for export lifecycle service operations.
pub type ExportLifecycleResult<T> = Result<T, ExportLifecycleError>;

/// Export lifecycle orchestration service.
///
/// Creates one execution and one task per export request, compensates when
/// the task cannot be created, and projects execution records into
/// [`ExportStatus`] views. Records are fetched fresh on every call.
#[derive(Clone)]
pub struct ExportLifecycleService<E, T, A>
where
    E: ExecutionStore,
    T: TaskStore,
    A: ArtifactStore,
{
    executions: Arc<E>,
    tasks: Arc<T>,
    projector: StatusProjector<A>,
    compensator: Compensator<E>,
    retention: usize,
}

impl<E, T, A> ExportLifecycleService<E, T, A>
where
    E: ExecutionStore,
    T: TaskStore,
    A: ArtifactStore,
{
    /// Creates a new export lifecycle service.
    #[must_use]
    pub fn new(
        executions: Arc<E>,
        tasks: Arc<T>,
        artifacts: Arc<A>,
        settings: &ExportSettings,
    ) -> Self {
        let compensator = Compensator::new(Arc::clone(&executions), settings.stop_timeout());
        Self {
            executions,
            tasks,
            projector: StatusProjector::new(artifacts),
            compensator,
            retention: settings.execution_retention,
        }
    }

    /// Returns a sweeper bounding the number of finished exports kept.
    #[must_use]
    pub fn sweeper(&self) -> ExecutionSweeper<E> {
        ExecutionSweeper::new(
            Arc::clone(&self.executions),
            export_vendor_type(),
            self.retention,
        )
    }

    /// Starts an export on behalf of `owner_id`.
    ///
    /// Creates the execution, then its single task. When the task cannot be
    /// created the execution is stopped and marked errored before the task
    /// store error is returned; the execution identifier is not returned in
    /// that case.
    ///
    /// # Errors
    ///
    /// Returns [`ExportLifecycleError::Parameters`] when the request cannot be
    /// encoded, [`ExportLifecycleError::ExecutionStore`] when the execution
    /// cannot be created and [`ExportLifecycleError::TaskStore`] when the task
    /// cannot be created.
    #[tracing::instrument(
        skip(self, request),
        fields(job_name = %request.job_name, user_name = %request.user_name)
    )]
    pub async fn start(
        &self,
        owner_id: OwnerId,
        request: ExportRequest,
    ) -> ExportLifecycleResult<ExecutionId> {
        let request_payload =
            serde_json::to_value(&request).map_err(ExportLifecycleError::Parameters)?;
        let attributes = ExtraAttributes::new()
            .with_job_name(request.job_name)
            .with_user_name(request.user_name);
        let new_execution = NewExecution::manual(export_vendor_type(), owner_id, attributes);

        let execution_id = self
            .executions
            .create(&new_execution)
            .await
            .inspect_err(|err| {
                tracing::error!(owner_id = %owner_id, error = %err, "failed to create export execution");
            })?;
        tracing::info!(
            execution_id = %execution_id,
            owner_id = %owner_id,
            "created export execution"
        );

        let job = export_job_spec(execution_id, request_payload, JobMode::Export);
        match self.tasks.create(execution_id, &job).await {
            Ok(task_id) => {
                tracing::info!(
                    execution_id = %execution_id,
                    task_id = %task_id,
                    "created export task"
                );
                Ok(execution_id)
            }
            Err(err) => {
                tracing::error!(
                    execution_id = %execution_id,
                    error = %err,
                    "failed to create export task"
                );
                self.compensator.compensate(execution_id, &err).await;
                Err(err.into())
            }
        }
    }

    /// Returns the export status of an execution.
    ///
    /// Returns `Ok(None)` when the execution does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ExportLifecycleError::ExecutionStore`] when the lookup fails.
    pub async fn get_execution(
        &self,
        execution_id: ExecutionId,
    ) -> ExportLifecycleResult<Option<ExportStatus>> {
        let execution = self
            .executions
            .get(execution_id)
            .await
            .inspect_err(|err| {
                tracing::error!(
                    execution_id = %execution_id,
                    error = %err,
                    "failed to fetch export execution"
                );
            })?;

        let Some(found) = execution else {
            tracing::info!(execution_id = %execution_id, "no export execution found");
            return Ok(None);
        };
        Ok(Some(self.projector.project(&found).await))
    }

    /// Lists the export statuses requested by `user_name`.
    ///
    /// Every matching execution is projected independently, in ascending
    /// identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`ExportLifecycleError::ExecutionStore`] when the query fails.
    pub async fn list_executions(
        &self,
        user_name: &str,
    ) -> ExportLifecycleResult<Vec<ExportStatus>> {
        let query = ExecutionQuery::new()
            .with_vendor_type(export_vendor_type())
            .with_attribute(ExtraAttributeKey::UserName, user_name);
        let executions = self.executions.list(&query).await?;

        let mut statuses = Vec::with_capacity(executions.len());
        for execution in &executions {
            statuses.push(self.projector.project(execution).await);
        }
        Ok(statuses)
    }

    /// Returns the most recently created task of an execution.
    ///
    /// # Errors
    ///
    /// Returns [`ExportLifecycleError::TaskNotFound`] when the execution has no
    /// task and [`ExportLifecycleError::TaskStore`] when the query fails.
    pub async fn get_task(&self, execution_id: ExecutionId) -> ExportLifecycleResult<Task> {
        let query = TaskQuery::new()
            .with_vendor_type(export_vendor_type())
            .with_execution_id(execution_id)
            .ordered(IdOrder::Descending);
        let newest = self
            .tasks
            .list(&query)
            .await?
            .into_iter()
            .next()
            .ok_or(ExportLifecycleError::TaskNotFound(execution_id))?;

        tracing::info!(
            execution_id = %execution_id,
            task_id = %newest.id(),
            "returning latest export task"
        );
        Ok(newest)
    }

    /// Deletes an execution.
    ///
    /// Dependent task and artifact cleanup is left to the stores.
    ///
    /// # Errors
    ///
    /// Returns [`ExportLifecycleError::ExecutionStore`] with the store error
    /// unchanged.
    pub async fn delete_execution(&self, execution_id: ExecutionId) -> ExportLifecycleResult<()> {
        self.executions
            .delete(execution_id)
            .await
            .inspect_err(|err| {
                tracing::error!(
                    execution_id = %execution_id,
                    error = %err,
                    "failed to delete export execution"
                );
            })?;
        Ok(())
    }
}
