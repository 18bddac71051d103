//! Shared world state for export lifecycle BDD scenarios.

use std::sync::Arc;

use async_trait::async_trait;
use export_lifecycle::{
    artifact::adapters::InMemoryArtifactStore,
    config::ExportSettings,
    execution::{
        adapters::memory::InMemoryJobStore,
        domain::{ExecutionId, JobSpec, OwnerId, Task, TaskId, TaskQuery},
        ports::{TaskStore, TaskStoreError, TaskStoreResult},
    },
    export::{
        domain::ExportStatus,
        services::{ExportLifecycleResult, ExportLifecycleService},
    },
    telemetry,
};
use rstest::fixture;

/// Task store delegating to the in-memory store unless told to fail.
pub struct FlakyTaskStore {
    inner: Arc<InMemoryJobStore>,
    failure: Option<String>,
}

#[async_trait]
impl TaskStore for FlakyTaskStore {
    async fn create(&self, execution_id: ExecutionId, job: &JobSpec) -> TaskStoreResult<TaskId> {
        if let Some(message) = &self.failure {
            return Err(TaskStoreError::persistence(std::io::Error::other(
                message.clone(),
            )));
        }
        self.inner.create(execution_id, job).await
    }

    async fn list(&self, query: &TaskQuery) -> TaskStoreResult<Vec<Task>> {
        self.inner.list(query).await
    }
}

/// Service type used by the BDD world.
pub type TestExportService =
    ExportLifecycleService<InMemoryJobStore, FlakyTaskStore, InMemoryArtifactStore>;

/// Scenario world for export lifecycle behaviour tests.
pub struct ExportWorld {
    pub jobs: Arc<InMemoryJobStore>,
    pub artifacts: Arc<InMemoryArtifactStore>,
    pub service: TestExportService,
    pub owner: OwnerId,
    pub last_execution: Option<ExecutionId>,
    pub last_start_result: Option<ExportLifecycleResult<ExecutionId>>,
    pub last_status: Option<ExportStatus>,
    pub last_listing: Vec<ExportStatus>,
    pub last_task_result: Option<ExportLifecycleResult<Task>>,
}

impl ExportWorld {
    /// Creates a world whose task store fails with `task_failure` when set.
    #[must_use]
    pub fn new(task_failure: Option<String>) -> Self {
        let settings = ExportSettings::default();
        telemetry::init(&settings);

        let jobs = Arc::new(InMemoryJobStore::new());
        let artifacts = Arc::new(InMemoryArtifactStore::new());
        let tasks = Arc::new(FlakyTaskStore {
            inner: Arc::clone(&jobs),
            failure: task_failure,
        });
        let service =
            ExportLifecycleService::new(Arc::clone(&jobs), tasks, Arc::clone(&artifacts), &settings);

        Self {
            jobs,
            artifacts,
            service,
            owner: OwnerId::new(1),
            last_execution: None,
            last_start_result: None,
            last_status: None,
            last_listing: Vec::new(),
            last_task_result: None,
        }
    }
}

impl Default for ExportWorld {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ExportWorld {
    ExportWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
