//! Execution aggregate and its optional side-channel attributes.

use super::{ExecutionId, ExecutionStatus, ExecutionTrigger, OwnerId, VendorType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognised keys of the execution extra attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraAttributeKey {
    /// Human-readable job name supplied by the requester.
    JobName,
    /// Name of the user who requested the job.
    UserName,
    /// Content digest of the produced artifact.
    Digest,
}

impl ExtraAttributeKey {
    /// Returns the persisted key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JobName => "job_name",
            Self::UserName => "user_name",
            Self::Digest => "artifact_digest",
        }
    }
}

impl fmt::Display for ExtraAttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional named data attached to an execution.
///
/// Each field is populated at a different lifecycle stage: the job and user
/// names when the execution is created, the digest once the runner has
/// produced the artifact. Unknown keys in persisted payloads are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAttributes {
    /// Job name supplied by the requester.
    #[serde(rename = "job_name", default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    /// Requesting user name.
    #[serde(rename = "user_name", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Artifact digest recorded by the runner.
    #[serde(
        rename = "artifact_digest",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub digest: Option<String>,
}

impl ExtraAttributes {
    /// Creates an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the job name.
    #[must_use]
    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = Some(job_name.into());
        self
    }

    /// Sets the user name.
    #[must_use]
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Sets the artifact digest.
    #[must_use]
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: ExtraAttributeKey) -> Option<&str> {
        match key {
            ExtraAttributeKey::JobName => self.job_name.as_deref(),
            ExtraAttributeKey::UserName => self.user_name.as_deref(),
            ExtraAttributeKey::Digest => self.digest.as_deref(),
        }
    }

    /// Overwrites the fields that are set in `update`, keeping the rest.
    pub fn merge(&mut self, update: &Self) {
        if let Some(job_name) = &update.job_name {
            self.job_name = Some(job_name.clone());
        }
        if let Some(user_name) = &update.user_name {
            self.user_name = Some(user_name.clone());
        }
        if let Some(digest) = &update.digest {
            self.digest = Some(digest.clone());
        }
    }
}

/// Parameter object describing an execution to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExecution {
    /// Job kind owning the execution.
    pub vendor_type: VendorType,
    /// Principal the execution runs on behalf of.
    pub owner_id: OwnerId,
    /// How the execution was started.
    pub trigger: ExecutionTrigger,
    /// Initial extra attributes.
    pub extra_attributes: ExtraAttributes,
}

impl NewExecution {
    /// Creates a manually triggered execution description.
    #[must_use]
    pub const fn manual(
        vendor_type: VendorType,
        owner_id: OwnerId,
        extra_attributes: ExtraAttributes,
    ) -> Self {
        Self {
            vendor_type,
            owner_id,
            trigger: ExecutionTrigger::Manual,
            extra_attributes,
        }
    }
}

/// Execution aggregate: the persisted record of one logical job request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    id: ExecutionId,
    vendor_type: VendorType,
    owner_id: OwnerId,
    status: ExecutionStatus,
    status_message: String,
    trigger: ExecutionTrigger,
    extra_attributes: ExtraAttributes,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    update_time: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedExecutionData {
    /// Persisted execution identifier.
    pub id: ExecutionId,
    /// Persisted job kind.
    pub vendor_type: VendorType,
    /// Persisted owner identifier.
    pub owner_id: OwnerId,
    /// Persisted lifecycle status.
    pub status: ExecutionStatus,
    /// Persisted status detail.
    pub status_message: String,
    /// Persisted trigger.
    pub trigger: ExecutionTrigger,
    /// Persisted extra attributes.
    pub extra_attributes: ExtraAttributes,
    /// Persisted start timestamp.
    pub start_time: DateTime<Utc>,
    /// Persisted end timestamp, unset while work is outstanding.
    pub end_time: Option<DateTime<Utc>>,
    /// Persisted latest update timestamp.
    pub update_time: DateTime<Utc>,
}

impl Execution {
    /// Creates a freshly stored, pending execution.
    #[must_use]
    pub fn new(id: ExecutionId, new_execution: NewExecution, now: DateTime<Utc>) -> Self {
        Self {
            id,
            vendor_type: new_execution.vendor_type,
            owner_id: new_execution.owner_id,
            status: ExecutionStatus::Pending,
            status_message: String::new(),
            trigger: new_execution.trigger,
            extra_attributes: new_execution.extra_attributes,
            start_time: now,
            end_time: None,
            update_time: now,
        }
    }

    /// Reconstructs an execution from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedExecutionData) -> Self {
        Self {
            id: data.id,
            vendor_type: data.vendor_type,
            owner_id: data.owner_id,
            status: data.status,
            status_message: data.status_message,
            trigger: data.trigger,
            extra_attributes: data.extra_attributes,
            start_time: data.start_time,
            end_time: data.end_time,
            update_time: data.update_time,
        }
    }

    /// Returns the execution identifier.
    #[must_use]
    pub const fn id(&self) -> ExecutionId {
        self.id
    }

    /// Returns the job kind owning the execution.
    #[must_use]
    pub const fn vendor_type(&self) -> &VendorType {
        &self.vendor_type
    }

    /// Returns the owner identifier.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ExecutionStatus {
        self.status
    }

    /// Returns the human-readable status detail.
    #[must_use]
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Returns the trigger.
    #[must_use]
    pub const fn trigger(&self) -> ExecutionTrigger {
        self.trigger
    }

    /// Returns the extra attributes.
    #[must_use]
    pub const fn extra_attributes(&self) -> &ExtraAttributes {
        &self.extra_attributes
    }

    /// Returns the start timestamp.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns the end timestamp, unset while work is outstanding.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn update_time(&self) -> DateTime<Utc> {
        self.update_time
    }

    /// Marks the execution as errored with the given detail.
    ///
    /// Applies regardless of the current status.
    pub fn mark_error(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.status = ExecutionStatus::Error;
        self.status_message = message.into();
        self.end_time = Some(now);
        self.update_time = now;
    }

    /// Marks an execution without tasks as stopped.
    ///
    /// Final executions are left untouched.
    pub fn mark_stopped(&mut self, now: DateTime<Utc>) {
        if self.status.is_final() {
            return;
        }
        self.status = ExecutionStatus::Stopped;
        self.end_time = Some(now);
        self.update_time = now;
    }

    /// Applies a status aggregated from the execution's tasks.
    ///
    /// Reaching a final status stamps the end time; leaving one clears it.
    pub fn refresh_status(&mut self, status: ExecutionStatus, now: DateTime<Utc>) {
        if self.status == status {
            return;
        }
        self.status = status;
        self.end_time = status.is_final().then_some(now);
        self.update_time = now;
    }

    /// Merges extra attributes into the execution.
    pub fn merge_extra_attributes(&mut self, update: &ExtraAttributes, now: DateTime<Utc>) {
        self.extra_attributes.merge(update);
        self.update_time = now;
    }
}
