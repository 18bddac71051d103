//! Execution and task records for asynchronous jobs.
//!
//! An execution is the persisted record of one logical job request; tasks are
//! the units of work the job runner picks up for it. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Retention services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
