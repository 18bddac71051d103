//! Deterministic artifact locations for export executions.

use super::EXPORT_VENDOR_TYPE;
use crate::artifact::domain::ArtifactRef;
use crate::execution::domain::ExecutionId;

/// Returns the artifact category export blobs are stored under.
#[must_use]
pub fn artifact_category() -> String {
    EXPORT_VENDOR_TYPE.to_lowercase()
}

/// Returns the per-execution repository holding the export blob.
#[must_use]
pub fn repository_name(execution_id: ExecutionId) -> String {
    format!("scandata_export_{execution_id}")
}

/// Returns the location of the export blob for an execution and digest.
#[must_use]
pub fn artifact_ref(execution_id: ExecutionId, digest: &str) -> ArtifactRef {
    ArtifactRef::new(artifact_category(), repository_name(execution_id), digest)
}
