//! Identifier and validated scalar types for the execution domain.

use super::ExecutionDomainError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Store-assigned identifier for an execution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(i64);

impl ExecutionId {
    /// Creates a validated execution identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidExecutionId`] when the value is
    /// not positive.
    pub const fn new(value: i64) -> Result<Self, ExecutionDomainError> {
        if value <= 0 {
            return Err(ExecutionDomainError::InvalidExecutionId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned identifier for a task record.
///
/// Task identifiers grow monotonically, so the largest identifier for an
/// execution names its most recently created task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a validated task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidTaskId`] when the value is not
    /// positive.
    pub const fn new(value: i64) -> Result<Self, ExecutionDomainError> {
        if value <= 0 {
            return Err(ExecutionDomainError::InvalidTaskId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the principal an execution runs on behalf of.
///
/// Persisted as the execution's vendor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(i64);

impl OwnerId {
    /// Wraps an owner identifier supplied by the authentication layer.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag identifying the feature that owns an execution or task.
///
/// Queries are scoped by this tag so sibling job kinds sharing the same
/// stores never see each other's records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorType(Cow<'static, str>);

impl VendorType {
    /// Creates a validated vendor type.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::EmptyVendorType`] when the value is
    /// empty after trimming, or [`ExecutionDomainError::InvalidVendorType`]
    /// when it contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ExecutionDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExecutionDomainError::EmptyVendorType);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ExecutionDomainError::InvalidVendorType(raw));
        }
        Ok(Self(Cow::Owned(trimmed.to_owned())))
    }

    /// Wraps a compile-time job kind tag without validation.
    ///
    /// The tag must be non-empty and free of whitespace.
    #[must_use]
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Returns the vendor type as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VendorType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for VendorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
