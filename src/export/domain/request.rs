//! Export request payload.

use serde::{Deserialize, Serialize};

/// Caller request to export a dataset.
///
/// Only the job and user names matter to the lifecycle controller; the
/// remaining criteria travel to the runner inside the task payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Requester-chosen job name.
    pub job_name: String,
    /// Requesting user name.
    pub user_name: String,
    /// Project identifiers to include.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<i64>,
    /// Label identifiers to include.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<i64>,
    /// Repository name pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories: Option<String>,
    /// Comma-separated vulnerability identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve_ids: Option<String>,
    /// Tag pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl ExportRequest {
    /// Creates a request with the required names.
    #[must_use]
    pub fn new(job_name: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    /// Restricts the export to the given projects.
    #[must_use]
    pub fn with_projects(mut self, projects: impl IntoIterator<Item = i64>) -> Self {
        self.projects = projects.into_iter().collect();
        self
    }

    /// Restricts the export to the given labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = i64>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Sets the repository pattern.
    #[must_use]
    pub fn with_repositories(mut self, repositories: impl Into<String>) -> Self {
        self.repositories = Some(repositories.into());
        self
    }

    /// Sets the vulnerability identifier filter.
    #[must_use]
    pub fn with_cve_ids(mut self, cve_ids: impl Into<String>) -> Self {
        self.cve_ids = Some(cve_ids.into());
        self
    }

    /// Sets the tag pattern.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}
