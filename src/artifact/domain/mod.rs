//! Domain model for stored artifacts.

mod reference;

pub use reference::ArtifactRef;
