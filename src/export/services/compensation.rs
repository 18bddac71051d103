//! Best-effort rollback for executions whose task could not be created.

use crate::execution::domain::ExecutionId;
use crate::execution::ports::ExecutionStore;
use std::sync::Arc;
use std::time::Duration;

/// Leaves an execution visibly errored after a failed task creation.
///
/// Both steps are best-effort: failures are logged and never returned, since
/// the caller already holds the error that triggered compensation.
#[derive(Clone)]
pub struct Compensator<E>
where
    E: ExecutionStore,
{
    executions: Arc<E>,
    stop_timeout: Duration,
}

impl<E> Compensator<E>
where
    E: ExecutionStore,
{
    /// Creates a compensator bounding its stop request by `stop_timeout`.
    #[must_use]
    pub const fn new(executions: Arc<E>, stop_timeout: Duration) -> Self {
        Self {
            executions,
            stop_timeout,
        }
    }

    /// Returns the bound applied to the stop request.
    #[must_use]
    pub const fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    /// Stops any tasks of the execution, then marks it errored with the text
    /// of `cause`.
    pub async fn compensate(
        &self,
        execution_id: ExecutionId,
        cause: &(dyn std::error::Error + Send + Sync),
    ) {
        let message = cause.to_string();
        self.stop(execution_id).await;

        if let Err(err) = self.executions.mark_error(execution_id, &message).await {
            tracing::error!(
                execution_id = %execution_id,
                error = %err,
                "failed to mark error for the execution"
            );
        }
    }

    async fn stop(&self, execution_id: ExecutionId) {
        let stop = self
            .executions
            .stop_and_wait(execution_id, self.stop_timeout);
        match tokio::time::timeout(self.stop_timeout, stop).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!(
                execution_id = %execution_id,
                error = %err,
                "failed to stop the execution"
            ),
            Err(_) => tracing::error!(
                execution_id = %execution_id,
                timeout = ?self.stop_timeout,
                "timed out stopping the execution"
            ),
        }
    }
}
