//! Export job lifecycle control.
//!
//! Callers request exports, poll their status and fetch the task handed to
//! the job runner. An export is one execution of the `SCAN_DATA_EXPORT` job
//! kind with exactly one task. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]
//!
//! Store ports live in [`crate::execution::ports`] and
//! [`crate::artifact::ports`].

pub mod domain;
pub mod services;
