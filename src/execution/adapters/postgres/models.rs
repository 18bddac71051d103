//! Diesel row models for execution and task persistence.

use super::schema::{executions, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for execution records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = executions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExecutionRow {
    /// Execution identifier.
    pub id: i64,
    /// Job kind.
    pub vendor_type: String,
    /// Owner identifier.
    pub vendor_id: i64,
    /// Lifecycle status.
    pub status: String,
    /// Status detail.
    pub status_message: String,
    /// Trigger.
    pub trigger: String,
    /// Extra attributes payload.
    pub extra_attrs: Value,
    /// Start timestamp.
    pub start_time: DateTime<Utc>,
    /// End timestamp.
    pub end_time: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub update_time: DateTime<Utc>,
}

/// Insert model for execution records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = executions)]
pub struct NewExecutionRow {
    /// Job kind.
    pub vendor_type: String,
    /// Owner identifier.
    pub vendor_id: i64,
    /// Lifecycle status.
    pub status: String,
    /// Status detail.
    pub status_message: String,
    /// Trigger.
    pub trigger: String,
    /// Extra attributes payload.
    pub extra_attrs: Value,
    /// Start timestamp.
    pub start_time: DateTime<Utc>,
    /// Last update timestamp.
    pub update_time: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Owning execution.
    pub execution_id: i64,
    /// Job kind.
    pub vendor_type: String,
    /// Scheduling kind.
    pub job_kind: String,
    /// Runner parameters.
    pub parameters: Value,
    /// Lifecycle status.
    pub status: String,
    /// Status detail.
    pub status_message: String,
    /// Creation timestamp.
    pub creation_time: DateTime<Utc>,
    /// End timestamp.
    pub end_time: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub update_time: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning execution.
    pub execution_id: i64,
    /// Job kind.
    pub vendor_type: String,
    /// Scheduling kind.
    pub job_kind: String,
    /// Runner parameters.
    pub parameters: Value,
    /// Lifecycle status.
    pub status: String,
    /// Status detail.
    pub status_message: String,
    /// Creation timestamp.
    pub creation_time: DateTime<Utc>,
    /// Last update timestamp.
    pub update_time: DateTime<Utc>,
}
