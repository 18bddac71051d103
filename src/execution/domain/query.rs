//! Query descriptions for execution and task lookups.

use super::{Execution, ExecutionId, ExtraAttributeKey, Task, VendorType};

/// Exact-match filter on one extra attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    /// Attribute to compare.
    pub key: ExtraAttributeKey,
    /// Required value.
    pub value: String,
}

/// Filter for listing executions.
///
/// Every populated criterion must match; an empty query matches all
/// executions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionQuery {
    vendor_type: Option<VendorType>,
    attributes: Vec<AttributeFilter>,
}

impl ExecutionQuery {
    /// Creates a query matching every execution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the query to one job kind.
    #[must_use]
    pub fn with_vendor_type(mut self, vendor_type: VendorType) -> Self {
        self.vendor_type = Some(vendor_type);
        self
    }

    /// Requires an extra attribute to equal `value`.
    #[must_use]
    pub fn with_attribute(mut self, key: ExtraAttributeKey, value: impl Into<String>) -> Self {
        self.attributes.push(AttributeFilter {
            key,
            value: value.into(),
        });
        self
    }

    /// Returns the job kind criterion.
    #[must_use]
    pub const fn vendor_type(&self) -> Option<&VendorType> {
        self.vendor_type.as_ref()
    }

    /// Returns the attribute criteria.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeFilter] {
        &self.attributes
    }

    /// Returns `true` when `execution` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, execution: &Execution) -> bool {
        let vendor_matches = self
            .vendor_type
            .as_ref()
            .is_none_or(|vendor_type| execution.vendor_type() == vendor_type);
        vendor_matches
            && self.attributes.iter().all(|filter| {
                execution.extra_attributes().get(filter.key) == Some(filter.value.as_str())
            })
    }
}

/// Sort order applied to task identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

/// Filter and ordering for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    vendor_type: Option<VendorType>,
    execution_id: Option<ExecutionId>,
    order: IdOrder,
}

impl TaskQuery {
    /// Creates a query matching every task in ascending id order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the query to one job kind.
    #[must_use]
    pub fn with_vendor_type(mut self, vendor_type: VendorType) -> Self {
        self.vendor_type = Some(vendor_type);
        self
    }

    /// Restricts the query to one execution.
    #[must_use]
    pub const fn with_execution_id(mut self, execution_id: ExecutionId) -> Self {
        self.execution_id = Some(execution_id);
        self
    }

    /// Sets the identifier ordering.
    #[must_use]
    pub const fn ordered(mut self, order: IdOrder) -> Self {
        self.order = order;
        self
    }

    /// Returns the job kind criterion.
    #[must_use]
    pub const fn vendor_type(&self) -> Option<&VendorType> {
        self.vendor_type.as_ref()
    }

    /// Returns the execution criterion.
    #[must_use]
    pub const fn execution_id(&self) -> Option<ExecutionId> {
        self.execution_id
    }

    /// Returns the identifier ordering.
    #[must_use]
    pub const fn order(&self) -> IdOrder {
        self.order
    }

    /// Returns `true` when `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let vendor_matches = self
            .vendor_type
            .as_ref()
            .is_none_or(|vendor_type| task.vendor_type() == vendor_type);
        let execution_matches = self
            .execution_id
            .is_none_or(|execution_id| task.execution_id() == execution_id);
        vendor_matches && execution_matches
    }
}
