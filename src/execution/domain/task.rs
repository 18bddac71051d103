//! Task records handed to the job runner.

use super::{ExecutionId, ParseStatusError, TaskId, TaskStatus, VendorType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scheduling kind of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Runs once when submitted.
    Generic,
    /// Runs on a schedule.
    Periodic,
}

impl JobKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Periodic => "periodic",
        }
    }
}

impl TryFrom<&str> for JobKind {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "periodic" => Ok(Self::Periodic),
            _ => Err(ParseStatusError::JobKind(value.to_owned())),
        }
    }
}

/// Description of the work a task carries to the job runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    name: VendorType,
    kind: JobKind,
    parameters: Map<String, Value>,
}

impl JobSpec {
    /// Creates a one-shot job description.
    #[must_use]
    pub const fn generic(name: VendorType, parameters: Map<String, Value>) -> Self {
        Self {
            name,
            kind: JobKind::Generic,
            parameters,
        }
    }

    /// Creates a job description of an explicit kind.
    #[must_use]
    pub const fn new(name: VendorType, kind: JobKind, parameters: Map<String, Value>) -> Self {
        Self {
            name,
            kind,
            parameters,
        }
    }

    /// Returns the job name, which doubles as the task vendor type.
    #[must_use]
    pub const fn name(&self) -> &VendorType {
        &self.name
    }

    /// Returns the job kind.
    #[must_use]
    pub const fn kind(&self) -> JobKind {
        self.kind
    }

    /// Returns the runner parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }
}

/// Unit of work scoped to one execution.
///
/// Lifecycle state is owned by the job runner; the export controller only
/// creates and queries tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    execution_id: ExecutionId,
    job: JobSpec,
    status: TaskStatus,
    status_message: String,
    creation_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    update_time: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning execution.
    pub execution_id: ExecutionId,
    /// Persisted job description.
    pub job: JobSpec,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted status detail.
    pub status_message: String,
    /// Persisted creation timestamp.
    pub creation_time: DateTime<Utc>,
    /// Persisted end timestamp.
    pub end_time: Option<DateTime<Utc>>,
    /// Persisted latest update timestamp.
    pub update_time: DateTime<Utc>,
}

impl Task {
    /// Creates a freshly stored, pending task.
    #[must_use]
    pub const fn new(
        id: TaskId,
        execution_id: ExecutionId,
        job: JobSpec,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            execution_id,
            job,
            status: TaskStatus::Pending,
            status_message: String::new(),
            creation_time: now,
            end_time: None,
            update_time: now,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            execution_id: data.execution_id,
            job: data.job,
            status: data.status,
            status_message: data.status_message,
            creation_time: data.creation_time,
            end_time: data.end_time,
            update_time: data.update_time,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning execution identifier.
    #[must_use]
    pub const fn execution_id(&self) -> ExecutionId {
        self.execution_id
    }

    /// Returns the task vendor type.
    #[must_use]
    pub const fn vendor_type(&self) -> &VendorType {
        self.job.name()
    }

    /// Returns the job description.
    #[must_use]
    pub const fn job(&self) -> &JobSpec {
        &self.job
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the status detail reported by the runner.
    #[must_use]
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    /// Returns the end timestamp, if the task has finished.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn update_time(&self) -> DateTime<Utc> {
        self.update_time
    }

    /// Records a status reported by the job runner.
    pub fn record_status(
        &mut self,
        status: TaskStatus,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        self.status_message = message.into();
        self.end_time = status.is_final().then_some(now);
        self.update_time = now;
    }

    /// Stops the task unless it already finished.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        if self.status.is_final() {
            return;
        }
        self.record_status(TaskStatus::Stopped, String::new(), now);
    }
}
