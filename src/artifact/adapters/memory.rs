//! In-memory content-addressed artifact store.

use crate::artifact::{
    domain::ArtifactRef,
    ports::{ArtifactStore, ArtifactStoreError, ArtifactStoreResult},
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory blob store keyed by [`ArtifactRef`].
///
/// Blobs are addressed by the `sha256:<hex>` digest of their content.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactStore {
    blobs: Arc<RwLock<HashMap<ArtifactRef, Vec<u8>>>>,
}

impl InMemoryArtifactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` under `category`/`repository` and returns its
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactStoreError::Storage`] when lock acquisition fails.
    pub fn put(
        &self,
        category: &str,
        repository: &str,
        content: impl Into<Vec<u8>>,
    ) -> ArtifactStoreResult<ArtifactRef> {
        let bytes = content.into();
        let artifact = ArtifactRef::new(category, repository, content_digest(&bytes));
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| ArtifactStoreError::storage(std::io::Error::other(err.to_string())))?;
        blobs.insert(artifact.clone(), bytes);
        Ok(artifact)
    }

    /// Removes a stored blob, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactStoreError::Storage`] when lock acquisition fails.
    pub fn remove(&self, artifact: &ArtifactRef) -> ArtifactStoreResult<bool> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| ArtifactStoreError::storage(std::io::Error::other(err.to_string())))?;
        Ok(blobs.remove(artifact).is_some())
    }
}

/// Computes the `sha256:<hex>` digest of `content`.
#[must_use]
pub fn content_digest(content: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(content))
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn exists(&self, artifact: &ArtifactRef) -> ArtifactStoreResult<bool> {
        let blobs = self
            .blobs
            .read()
            .map_err(|err| ArtifactStoreError::storage(std::io::Error::other(err.to_string())))?;
        Ok(blobs.contains_key(artifact))
    }
}
