//! Externally visible export status.

use crate::execution::domain::{ExecutionId, ExecutionStatus, ExecutionTrigger, OwnerId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Read-side view of an export execution.
///
/// Recomputed on every read and never persisted, so `file_present` flips to
/// `true` as soon as the exported artifact appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatus {
    /// Execution identifier.
    pub id: ExecutionId,
    /// Principal the export runs on behalf of.
    pub owner_id: OwnerId,
    /// Execution status.
    pub status: ExecutionStatus,
    /// Status detail.
    pub status_message: String,
    /// How the export was started.
    pub trigger: ExecutionTrigger,
    /// Start timestamp.
    pub start_time: DateTime<Utc>,
    /// End timestamp, unset while running.
    pub end_time: Option<DateTime<Utc>>,
    /// Digest of the exported artifact, empty until the runner records it.
    pub export_data_digest: String,
    /// Requester-chosen job name.
    pub job_name: String,
    /// Requesting user name.
    pub user_name: String,
    /// Whether the exported artifact currently exists.
    pub file_present: bool,
}
