//! Adapter implementations for artifact store ports.

mod memory;

pub use memory::{InMemoryArtifactStore, content_digest};
