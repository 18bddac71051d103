//! Runtime settings for export lifecycle control.
//!
//! Settings are read from JSON. Every field has a default, so an empty object
//! yields the reference behaviour:
//!
//! ```json
//! {
//!   "stop_timeout_secs": 10,
//!   "execution_retention": 50,
//!   "log_filter": "info"
//! }
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_EXECUTION_RETENTION: usize = 50;

/// Errors raised while loading [`ExportSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings payload is not valid JSON for [`ExportSettings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Tunables for the export lifecycle service and its housekeeping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    /// Upper bound, in seconds, on stopping an execution during compensation.
    pub stop_timeout_secs: u64,
    /// Finished executions kept per sweep.
    pub execution_retention: usize,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
            execution_retention: DEFAULT_EXECUTION_RETENTION,
            log_filter: "info".to_owned(),
        }
    }
}

impl ExportSettings {
    /// Parses settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed JSON or unknown fields.
    pub fn from_json_str(payload: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(payload).map_err(SettingsError::Parse)
    }

    /// Reads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] when the file cannot be read and
    /// [`SettingsError::Parse`] when its content is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let file_path = path.as_ref();
        let payload = std::fs::read_to_string(file_path).map_err(|source| SettingsError::Read {
            path: file_path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    /// Returns the compensation stop bound.
    #[must_use]
    pub const fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}
