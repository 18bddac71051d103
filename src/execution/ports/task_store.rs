//! Store port for task persistence.

use crate::execution::domain::{ExecutionId, JobSpec, Task, TaskId, TaskQuery};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new pending task for an execution and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::ExecutionNotFound`] when the execution does
    /// not exist.
    async fn create(&self, execution_id: ExecutionId, job: &JobSpec) -> TaskStoreResult<TaskId>;

    /// Lists tasks matching `query` in the order it requests.
    async fn list(&self, query: &TaskQuery) -> TaskStoreResult<Vec<Task>>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The owning execution does not exist.
    #[error("execution not found: {0}")]
    ExecutionNotFound(ExecutionId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure, displayed as the underlying error text.
    #[error("{0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
