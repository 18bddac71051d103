//! Adapter implementations for execution and task store ports.

pub mod memory;
pub mod postgres;
