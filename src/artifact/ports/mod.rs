//! Port contracts for artifact lookups.

mod store;

pub use store::{ArtifactStore, ArtifactStoreError, ArtifactStoreResult};
