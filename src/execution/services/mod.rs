//! Application services over execution records.

mod sweeper;

pub use sweeper::{ExecutionSweeper, SweepReport};
