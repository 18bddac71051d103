//! Domain model for execution and task records.
//!
//! Executions represent logical job requests; tasks are the units of work
//! handed to the job runner for an execution. Both are persisted by external
//! stores, so the domain only carries identity, lifecycle vocabulary and the
//! transitions those stores apply.

mod error;
mod execution;
mod ids;
mod query;
mod status;
mod task;

pub use error::{ExecutionDomainError, ParseStatusError};
pub use execution::{
    Execution, ExtraAttributeKey, ExtraAttributes, NewExecution, PersistedExecutionData,
};
pub use ids::{ExecutionId, OwnerId, TaskId, VendorType};
pub use query::{AttributeFilter, ExecutionQuery, IdOrder, TaskQuery};
pub use status::{ExecutionStatus, ExecutionTrigger, TaskStatus};
pub use task::{JobKind, JobSpec, PersistedTaskData, Task};
