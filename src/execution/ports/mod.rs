//! Port contracts for execution and task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by execution and
//! export services.

mod execution_store;
mod task_store;

pub use execution_store::{ExecutionStore, ExecutionStoreError, ExecutionStoreResult};
pub use task_store::{TaskStore, TaskStoreError, TaskStoreResult};
