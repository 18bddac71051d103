//! Job kind and task payload vocabulary for export jobs.

use crate::execution::domain::{ExecutionId, JobSpec, VendorType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Job kind tag shared by export executions and tasks.
pub const EXPORT_VENDOR_TYPE: &str = "SCAN_DATA_EXPORT";

/// Parameter key carrying the owning execution identifier.
const JOB_ID_KEY: &str = "JobId";
/// Parameter key carrying the serialized export request.
const REQUEST_KEY: &str = "Request";
/// Parameter key carrying the job mode.
const JOB_MODE_KEY: &str = "mode";

/// Returns the export job kind.
#[must_use]
pub const fn export_vendor_type() -> VendorType {
    VendorType::from_static(EXPORT_VENDOR_TYPE)
}

/// Operation the export runner performs for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobMode {
    /// Produce the export artifact.
    Export,
}

impl JobMode {
    /// Returns the parameter value understood by the runner.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Export => "export",
        }
    }
}

/// Builds the job description for an export task.
///
/// `request` is the serialized [`super::ExportRequest`] handed to the runner
/// unchanged.
#[must_use]
pub fn export_job_spec(execution_id: ExecutionId, request: Value, mode: JobMode) -> JobSpec {
    let mut parameters = Map::new();
    parameters.insert(JOB_ID_KEY.to_owned(), Value::from(execution_id.value()));
    parameters.insert(REQUEST_KEY.to_owned(), request);
    parameters.insert(JOB_MODE_KEY.to_owned(), Value::from(mode.as_str()));
    JobSpec::generic(export_vendor_type(), parameters)
}
