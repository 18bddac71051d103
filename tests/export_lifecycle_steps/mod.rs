//! Step definitions for export lifecycle BDD scenarios.

pub mod given;
pub mod then;
pub mod world;
