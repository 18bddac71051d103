//! Export lifecycle: execution and task control for asynchronous exports.
//!
//! A caller requests an export; the crate records an execution, hands exactly
//! one task to the job runner, and later answers whether the export finished
//! and whether its artifact exists.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure lifecycle vocabulary with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the execution, task and
//!   artifact stores
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`execution`]: Execution and task records, stores and retention sweeping
//! - [`artifact`]: Artifact existence lookups
//! - [`export`]: Export request orchestration and status projection
//! - [`config`]: Runtime settings
//! - [`telemetry`]: Tracing subscriber bootstrap

pub mod artifact;
pub mod config;
pub mod execution;
pub mod export;
pub mod telemetry;
