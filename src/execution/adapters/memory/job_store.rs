//! In-memory execution and task store for tests and local orchestration.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::execution::{
    domain::{
        Execution, ExecutionId, ExecutionQuery, ExecutionStatus, ExtraAttributes, IdOrder,
        JobSpec, NewExecution, Task, TaskId, TaskQuery, TaskStatus,
    },
    ports::{
        ExecutionStore, ExecutionStoreError, ExecutionStoreResult, TaskStore, TaskStoreError,
        TaskStoreResult,
    },
};

/// Interval between status checks while waiting for an execution to stop.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Thread-safe in-memory store implementing both [`ExecutionStore`] and
/// [`TaskStore`].
///
/// Executions and tasks share one state because stopping an execution has to
/// reach its tasks. Identifiers are assigned from monotonically increasing
/// sequences starting at 1.
#[derive(Debug, Clone)]
pub struct InMemoryJobStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<InMemoryJobState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryJobState {
    executions: BTreeMap<ExecutionId, Execution>,
    tasks: BTreeMap<TaskId, Task>,
    last_execution_id: i64,
    last_task_id: i64,
}

impl InMemoryJobStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryJobStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryJobStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping records with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryJobState::default())),
            clock,
        }
    }

    /// Records a status reported by the job runner for a task and refreshes
    /// the owning execution's aggregated status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    pub fn record_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        message: impl Into<String>,
    ) -> TaskStoreResult<()> {
        let now = self.clock.utc();
        let mut state = self.write_state().map_err(TaskStoreError::persistence)?;
        let task = state
            .tasks
            .get_mut(&task_id)
            .ok_or(TaskStoreError::NotFound(task_id))?;
        task.record_status(status, message, now);
        let execution_id = task.execution_id();
        state.refresh_execution(execution_id, now);
        Ok(())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, InMemoryJobState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, InMemoryJobState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn execution_status(&self, id: ExecutionId) -> ExecutionStoreResult<ExecutionStatus> {
        let state = self.read_state().map_err(ExecutionStoreError::persistence)?;
        state
            .executions
            .get(&id)
            .map(Execution::status)
            .ok_or(ExecutionStoreError::NotFound(id))
    }

    async fn wait_until_final(&self, id: ExecutionId) -> ExecutionStoreResult<()> {
        while !self.execution_status(id)?.is_final() {
            tokio::time::sleep(STOP_POLL_INTERVAL).await;
        }
        Ok(())
    }

    fn stop_tasks(&self, id: ExecutionId) -> ExecutionStoreResult<()> {
        let now = self.clock.utc();
        let mut state = self.write_state().map_err(ExecutionStoreError::persistence)?;
        if !state.executions.contains_key(&id) {
            return Err(ExecutionStoreError::NotFound(id));
        }

        let mut has_tasks = false;
        for task in state
            .tasks
            .values_mut()
            .filter(|task| task.execution_id() == id)
        {
            has_tasks = true;
            task.stop(now);
        }

        if has_tasks {
            state.refresh_execution(id, now);
        } else if let Some(execution) = state.executions.get_mut(&id) {
            execution.mark_stopped(now);
        }
        Ok(())
    }
}

impl InMemoryJobState {
    fn refresh_execution(&mut self, id: ExecutionId, now: chrono::DateTime<chrono::Utc>) {
        let statuses: Vec<TaskStatus> = self
            .tasks
            .values()
            .filter(|task| task.execution_id() == id)
            .map(Task::status)
            .collect();
        let Some(aggregated) = ExecutionStatus::aggregate(statuses) else {
            return;
        };
        if let Some(execution) = self.executions.get_mut(&id) {
            execution.refresh_status(aggregated, now);
        }
    }
}

#[async_trait]
impl<C> ExecutionStore for InMemoryJobStore<C>
where
    C: Clock + Send + Sync,
{
    async fn create(&self, execution: &NewExecution) -> ExecutionStoreResult<ExecutionId> {
        let now = self.clock.utc();
        let mut state = self.write_state().map_err(ExecutionStoreError::persistence)?;
        let next = state.last_execution_id + 1;
        let id = ExecutionId::new(next).map_err(ExecutionStoreError::persistence)?;
        state.last_execution_id = next;
        state
            .executions
            .insert(id, Execution::new(id, execution.clone(), now));
        Ok(id)
    }

    async fn get(&self, id: ExecutionId) -> ExecutionStoreResult<Option<Execution>> {
        let state = self.read_state().map_err(ExecutionStoreError::persistence)?;
        Ok(state.executions.get(&id).cloned())
    }

    async fn list(&self, query: &ExecutionQuery) -> ExecutionStoreResult<Vec<Execution>> {
        let state = self.read_state().map_err(ExecutionStoreError::persistence)?;
        Ok(state
            .executions
            .values()
            .filter(|execution| query.matches(execution))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: ExecutionId) -> ExecutionStoreResult<()> {
        let mut state = self.write_state().map_err(ExecutionStoreError::persistence)?;
        if !state.executions.contains_key(&id) {
            return Err(ExecutionStoreError::NotFound(id));
        }
        let has_unfinished_tasks = state
            .tasks
            .values()
            .any(|task| task.execution_id() == id && !task.status().is_final());
        if has_unfinished_tasks {
            return Err(ExecutionStoreError::Conflict(id));
        }

        state.tasks.retain(|_, task| task.execution_id() != id);
        state.executions.remove(&id);
        Ok(())
    }

    async fn stop_and_wait(&self, id: ExecutionId, timeout: Duration) -> ExecutionStoreResult<()> {
        self.stop_tasks(id)?;
        tokio::time::timeout(timeout, self.wait_until_final(id))
            .await
            .map_err(|_| ExecutionStoreError::Timeout { id, timeout })?
    }

    async fn mark_error(&self, id: ExecutionId, message: &str) -> ExecutionStoreResult<()> {
        let now = self.clock.utc();
        let mut state = self.write_state().map_err(ExecutionStoreError::persistence)?;
        let execution = state
            .executions
            .get_mut(&id)
            .ok_or(ExecutionStoreError::NotFound(id))?;
        execution.mark_error(message, now);
        Ok(())
    }

    async fn update_extra_attributes(
        &self,
        id: ExecutionId,
        attributes: &ExtraAttributes,
    ) -> ExecutionStoreResult<()> {
        let now = self.clock.utc();
        let mut state = self.write_state().map_err(ExecutionStoreError::persistence)?;
        let execution = state
            .executions
            .get_mut(&id)
            .ok_or(ExecutionStoreError::NotFound(id))?;
        execution.merge_extra_attributes(attributes, now);
        Ok(())
    }
}

#[async_trait]
impl<C> TaskStore for InMemoryJobStore<C>
where
    C: Clock + Send + Sync,
{
    async fn create(&self, execution_id: ExecutionId, job: &JobSpec) -> TaskStoreResult<TaskId> {
        let now = self.clock.utc();
        let mut state = self.write_state().map_err(TaskStoreError::persistence)?;
        if !state.executions.contains_key(&execution_id) {
            return Err(TaskStoreError::ExecutionNotFound(execution_id));
        }
        let next = state.last_task_id + 1;
        let id = TaskId::new(next).map_err(TaskStoreError::persistence)?;
        state.last_task_id = next;
        state
            .tasks
            .insert(id, Task::new(id, execution_id, job.clone(), now));
        state.refresh_execution(execution_id, now);
        Ok(id)
    }

    async fn list(&self, query: &TaskQuery) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state().map_err(TaskStoreError::persistence)?;
        let matching = state.tasks.values().filter(|task| query.matches(task)).cloned();
        let tasks = match query.order() {
            IdOrder::Ascending => matching.collect(),
            IdOrder::Descending => matching.rev().collect(),
        };
        Ok(tasks)
    }
}
