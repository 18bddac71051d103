//! Artifact blob lookups.
//!
//! Export jobs leave their output in an external blob store. This module
//! models only the read-side existence probe the export status projection
//! needs:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
