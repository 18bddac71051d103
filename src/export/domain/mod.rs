//! Domain model for data export jobs.
//!
//! Export requests become executions of the [`EXPORT_VENDOR_TYPE`] job kind;
//! their status is projected from the execution record and the presence of
//! the exported artifact.

mod job;
mod naming;
mod request;
mod status;

pub use job::{EXPORT_VENDOR_TYPE, JobMode, export_job_spec, export_vendor_type};
pub use naming::{artifact_category, artifact_ref, repository_name};
pub use request::ExportRequest;
pub use status::ExportStatus;
