//! Error types for execution domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing execution domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionDomainError {
    /// The execution identifier is not a positive integer.
    #[error("invalid execution identifier {0}, expected a positive integer")]
    InvalidExecutionId(i64),

    /// The task identifier is not a positive integer.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The vendor type is empty after trimming.
    #[error("vendor type must not be empty")]
    EmptyVendorType,

    /// The vendor type contains whitespace.
    #[error("invalid vendor type '{0}', whitespace is not allowed")]
    InvalidVendorType(String),
}

/// Error returned while parsing lifecycle vocabulary from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseStatusError {
    /// The value is not a known execution or task status.
    #[error("unknown status: {0}")]
    Status(String),

    /// The value is not a known execution trigger.
    #[error("unknown execution trigger: {0}")]
    Trigger(String),

    /// The value is not a known job kind.
    #[error("unknown job kind: {0}")]
    JobKind(String),
}
