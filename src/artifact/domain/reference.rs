//! Location of an artifact blob.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category, repository and digest addressing one artifact blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef {
    category: String,
    repository: String,
    digest: String,
}

impl ArtifactRef {
    /// Creates an artifact reference.
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        repository: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            repository: repository.into(),
            digest: digest.into(),
        }
    }

    /// Returns the artifact category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the repository name.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the content digest.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.category, self.repository, self.digest)
    }
}
