//! Store port for execution persistence and control.

use crate::execution::domain::{Execution, ExecutionId, ExecutionQuery, ExtraAttributes, NewExecution};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for execution store operations.
pub type ExecutionStoreResult<T> = Result<T, ExecutionStoreError>;

/// Execution persistence contract.
///
/// Implementations own durability and per-record atomicity; callers never
/// cache records across calls.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Stores a new pending execution and returns its assigned identifier.
    async fn create(&self, execution: &NewExecution) -> ExecutionStoreResult<ExecutionId>;

    /// Fetches an execution.
    ///
    /// Returns `None` when the execution does not exist.
    async fn get(&self, id: ExecutionId) -> ExecutionStoreResult<Option<Execution>>;

    /// Lists executions matching `query` in ascending identifier order.
    async fn list(&self, query: &ExecutionQuery) -> ExecutionStoreResult<Vec<Execution>>;

    /// Deletes an execution together with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError::NotFound`] for an unknown identifier and
    /// [`ExecutionStoreError::Conflict`] while any task is still unfinished.
    async fn delete(&self, id: ExecutionId) -> ExecutionStoreResult<()>;

    /// Stops every unfinished task of the execution and waits for the
    /// execution to reach a final status.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError::Timeout`] when the execution is still
    /// unfinished after `timeout`.
    async fn stop_and_wait(&self, id: ExecutionId, timeout: Duration) -> ExecutionStoreResult<()>;

    /// Marks the execution as errored with `message` as its status detail.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError::NotFound`] for an unknown identifier.
    async fn mark_error(&self, id: ExecutionId, message: &str) -> ExecutionStoreResult<()>;

    /// Merges the set fields of `attributes` into the execution.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError::NotFound`] for an unknown identifier.
    async fn update_extra_attributes(
        &self,
        id: ExecutionId,
        attributes: &ExtraAttributes,
    ) -> ExecutionStoreResult<()>;
}

/// Errors returned by execution store implementations.
#[derive(Debug, Clone, Error)]
pub enum ExecutionStoreError {
    /// The execution was not found.
    #[error("execution not found: {0}")]
    NotFound(ExecutionId),

    /// The execution still has unfinished tasks.
    #[error("execution {0} has tasks that are not in a final status")]
    Conflict(ExecutionId),

    /// The execution did not reach a final status within the bound.
    #[error("timed out after {timeout:?} waiting for execution {id} to stop")]
    Timeout {
        /// Execution identifier.
        id: ExecutionId,
        /// Bound that elapsed.
        timeout: Duration,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ExecutionStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
