//! Application services for export lifecycle orchestration.

mod compensation;
mod lifecycle;
mod projection;

pub use compensation::Compensator;
pub use lifecycle::{ExportLifecycleError, ExportLifecycleResult, ExportLifecycleService};
pub use projection::StatusProjector;
