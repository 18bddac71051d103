//! In-memory adapters for execution and task persistence.

mod job_store;

pub use job_store::InMemoryJobStore;
