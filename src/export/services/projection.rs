//! Projection of execution records into export status views.

use crate::artifact::ports::ArtifactStore;
use crate::execution::domain::{Execution, ExecutionId};
use crate::export::domain::{ExportStatus, artifact_ref};
use std::sync::Arc;

/// Maps executions to [`ExportStatus`] views, probing the artifact store for
/// the exported file.
#[derive(Clone)]
pub struct StatusProjector<A>
where
    A: ArtifactStore,
{
    artifacts: Arc<A>,
}

impl<A> StatusProjector<A>
where
    A: ArtifactStore,
{
    /// Creates a projector over an artifact store.
    #[must_use]
    pub const fn new(artifacts: Arc<A>) -> Self {
        Self { artifacts }
    }

    /// Projects an execution into its export status.
    ///
    /// Attributes the runner has not populated yet project to empty strings.
    pub async fn project(&self, execution: &Execution) -> ExportStatus {
        let attributes = execution.extra_attributes();
        let export_data_digest = attributes.digest.clone().unwrap_or_default();
        let file_present = self
            .is_artifact_present(execution.id(), &export_data_digest)
            .await;

        ExportStatus {
            id: execution.id(),
            owner_id: execution.owner_id(),
            status: execution.status(),
            status_message: execution.status_message().to_owned(),
            trigger: execution.trigger(),
            start_time: execution.start_time(),
            end_time: execution.end_time(),
            export_data_digest,
            job_name: attributes.job_name.clone().unwrap_or_default(),
            user_name: attributes.user_name.clone().unwrap_or_default(),
            file_present,
        }
    }

    /// Reports whether the export artifact for an execution exists.
    ///
    /// Lookup failures read as "not present yet".
    pub async fn is_artifact_present(&self, execution_id: ExecutionId, digest: &str) -> bool {
        let artifact = artifact_ref(execution_id, digest);
        match self.artifacts.exists(&artifact).await {
            Ok(exists) => exists,
            Err(err) => {
                tracing::debug!(
                    execution_id = %execution_id,
                    artifact = %artifact,
                    error = %err,
                    "artifact lookup failed, reporting export file as absent"
                );
                false
            }
        }
    }
}
