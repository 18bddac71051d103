//! Lifecycle status vocabulary shared by executions and tasks.

use super::ParseStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Work has been requested but not picked up.
    Pending,
    /// Work is in progress.
    Running,
    /// Work was stopped before completion.
    Stopped,
    /// Work failed.
    Error,
    /// Work completed successfully.
    Success,
}

impl ExecutionStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Success => "success",
        }
    }

    /// Returns `true` when no further transitions are expected.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Stopped | Self::Error | Self::Success)
    }

    /// Derives an execution status from the statuses of its tasks.
    ///
    /// Returns `None` for an empty task set; the execution then keeps the
    /// status it already has.
    #[must_use]
    pub fn aggregate(task_statuses: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut seen = false;
        let (mut running, mut pending, mut error, mut stopped) = (false, false, false, false);
        for status in task_statuses {
            seen = true;
            match status {
                Self::Running => running = true,
                Self::Pending => pending = true,
                Self::Error => error = true,
                Self::Stopped => stopped = true,
                Self::Success => {}
            }
        }

        if !seen {
            return None;
        }
        let aggregated = if running {
            Self::Running
        } else if pending {
            Self::Pending
        } else if error {
            Self::Error
        } else if stopped {
            Self::Stopped
        } else {
            Self::Success
        };
        Some(aggregated)
    }
}

impl TryFrom<&str> for ExecutionStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, ParseStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "stopped" => Ok(Self::Stopped),
            "error" => Ok(Self::Error),
            "success" => Ok(Self::Success),
            _ => Err(ParseStatusError::Status(value.to_owned())),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tasks share the execution status vocabulary.
pub type TaskStatus = ExecutionStatus;

/// How an execution was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionTrigger {
    /// Started by an explicit caller request.
    Manual,
    /// Started by a schedule.
    Schedule,
    /// Started in reaction to an event.
    Event,
}

impl ExecutionTrigger {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Schedule => "schedule",
            Self::Event => "event",
        }
    }
}

impl TryFrom<&str> for ExecutionTrigger {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "schedule" => Ok(Self::Schedule),
            "event" => Ok(Self::Event),
            _ => Err(ParseStatusError::Trigger(value.to_owned())),
        }
    }
}

impl fmt::Display for ExecutionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
