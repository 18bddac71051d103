//! Read-side port over the artifact blob store.

use crate::artifact::domain::ArtifactRef;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for artifact store operations.
pub type ArtifactStoreResult<T> = Result<T, ArtifactStoreError>;

/// Artifact existence contract.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Reports whether the referenced artifact currently exists.
    async fn exists(&self, artifact: &ArtifactRef) -> ArtifactStoreResult<bool>;
}

/// Errors returned by artifact store implementations.
#[derive(Debug, Clone, Error)]
pub enum ArtifactStoreError {
    /// The store could not be reached.
    #[error("artifact store unavailable: {0}")]
    Unavailable(String),

    /// Storage-layer failure.
    #[error("artifact storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl ArtifactStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
