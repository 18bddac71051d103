//! `PostgreSQL` store implementation for executions and tasks.

use super::{
    models::{ExecutionRow, NewExecutionRow, NewTaskRow, TaskRow},
    schema::{executions, tasks},
};
use crate::execution::{
    domain::{
        Execution, ExecutionId, ExecutionQuery, ExecutionStatus, ExecutionTrigger,
        ExtraAttributes, IdOrder, JobKind, JobSpec, NewExecution, OwnerId,
        PersistedExecutionData, PersistedTaskData, Task, TaskId, TaskQuery, TaskStatus,
        VendorType,
    },
    ports::{
        ExecutionStore, ExecutionStoreError, ExecutionStoreResult, TaskStore, TaskStoreError,
        TaskStoreResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Bool, Text};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use std::time::Duration;

/// `PostgreSQL` connection pool type used by the job store.
pub type JobPgPool = Pool<ConnectionManager<PgConnection>>;

/// Statuses from which work can still progress.
const UNFINISHED_STATUSES: [&str; 2] = [
    ExecutionStatus::Pending.as_str(),
    ExecutionStatus::Running.as_str(),
];

/// Interval between status checks while waiting for an execution to stop.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// `PostgreSQL`-backed store implementing both [`ExecutionStore`] and
/// [`TaskStore`].
#[derive(Debug, Clone)]
pub struct PostgresJobStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    pool: JobPgPool,
    clock: Arc<C>,
}

impl PostgresJobStore<DefaultClock> {
    /// Creates a store from a `PostgreSQL` connection pool using the system
    /// clock.
    #[must_use]
    pub fn new(pool: JobPgPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }
}

/// Store error types that can carry an opaque persistence failure.
trait PersistenceFailure: Send + 'static {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for ExecutionStoreError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for TaskStoreError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// Error carried out of a Diesel transaction closure.
enum TransactionError<E> {
    Store(E),
    Database(DieselError),
}

impl<E> From<DieselError> for TransactionError<E> {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

fn in_transaction<T, E, F>(connection: &mut PgConnection, f: F) -> Result<T, E>
where
    E: PersistenceFailure,
    F: FnOnce(&mut PgConnection) -> Result<T, TransactionError<E>>,
{
    connection
        .transaction::<T, TransactionError<E>, _>(f)
        .map_err(|err| match err {
            TransactionError::Store(store_err) => store_err,
            TransactionError::Database(db_err) => E::from_failure(db_err),
        })
}

impl<C> PostgresJobStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a store from a `PostgreSQL` connection pool stamping records
    /// with `clock`.
    #[must_use]
    pub const fn with_clock(pool: JobPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_failure)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_failure)?
    }

    async fn wait_until_final(&self, id: ExecutionId) -> ExecutionStoreResult<()> {
        loop {
            let status = self
                .run_blocking(move |connection| load_execution_status(connection, id))
                .await?;
            if status.is_final() {
                return Ok(());
            }
            tokio::time::sleep(STOP_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl<C> ExecutionStore for PostgresJobStore<C>
where
    C: Clock + Send + Sync,
{
    async fn create(&self, execution: &NewExecution) -> ExecutionStoreResult<ExecutionId> {
        let new_row = to_new_execution_row(execution, self.clock.utc())?;
        self.run_blocking(move |connection| {
            let id = diesel::insert_into(executions::table)
                .values(&new_row)
                .returning(executions::id)
                .get_result::<i64>(connection)
                .map_err(ExecutionStoreError::persistence)?;
            ExecutionId::new(id).map_err(ExecutionStoreError::persistence)
        })
        .await
    }

    async fn get(&self, id: ExecutionId) -> ExecutionStoreResult<Option<Execution>> {
        self.run_blocking(move |connection| {
            let row = executions::table
                .filter(executions::id.eq(id.value()))
                .select(ExecutionRow::as_select())
                .first::<ExecutionRow>(connection)
                .optional()
                .map_err(ExecutionStoreError::persistence)?;
            row.map(row_to_execution).transpose()
        })
        .await
    }

    async fn list(&self, query: &ExecutionQuery) -> ExecutionStoreResult<Vec<Execution>> {
        let vendor_type = query.vendor_type().map(|vendor| vendor.as_str().to_owned());
        let attributes: Vec<(&'static str, String)> = query
            .attributes()
            .iter()
            .map(|filter| (filter.key.as_str(), filter.value.clone()))
            .collect();

        self.run_blocking(move |connection| {
            let mut statement = executions::table
                .select(ExecutionRow::as_select())
                .order(executions::id.asc())
                .into_boxed();
            if let Some(vendor) = vendor_type {
                statement = statement.filter(executions::vendor_type.eq(vendor));
            }
            for (key, value) in attributes {
                // Keys come from a closed set, so only the value is bound.
                statement = statement.filter(
                    sql::<Bool>(&format!("extra_attrs->>'{key}' = ")).bind::<Text, _>(value),
                );
            }

            let rows = statement
                .load::<ExecutionRow>(connection)
                .map_err(ExecutionStoreError::persistence)?;
            rows.into_iter().map(row_to_execution).collect()
        })
        .await
    }

    async fn delete(&self, id: ExecutionId) -> ExecutionStoreResult<()> {
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                let unfinished = tasks::table
                    .filter(tasks::execution_id.eq(id.value()))
                    .filter(tasks::status.eq_any(UNFINISHED_STATUSES))
                    .count()
                    .get_result::<i64>(tx)?;
                if unfinished > 0 {
                    return Err(TransactionError::Store(ExecutionStoreError::Conflict(id)));
                }

                diesel::delete(tasks::table.filter(tasks::execution_id.eq(id.value())))
                    .execute(tx)?;
                let deleted =
                    diesel::delete(executions::table.filter(executions::id.eq(id.value())))
                        .execute(tx)?;
                if deleted == 0 {
                    return Err(TransactionError::Store(ExecutionStoreError::NotFound(id)));
                }
                Ok(())
            })
        })
        .await
    }

    async fn stop_and_wait(&self, id: ExecutionId, timeout: Duration) -> ExecutionStoreResult<()> {
        let now = self.clock.utc();
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                load_execution_status(tx, id).map_err(TransactionError::Store)?;
                diesel::update(
                    tasks::table
                        .filter(tasks::execution_id.eq(id.value()))
                        .filter(tasks::status.eq_any(UNFINISHED_STATUSES)),
                )
                .set((
                    tasks::status.eq(TaskStatus::Stopped.as_str()),
                    tasks::end_time.eq(Some(now)),
                    tasks::update_time.eq(now),
                ))
                .execute(tx)?;
                refresh_execution_status(tx, id, now)
            })
        })
        .await?;

        tokio::time::timeout(timeout, self.wait_until_final(id))
            .await
            .map_err(|_| ExecutionStoreError::Timeout { id, timeout })?
    }

    async fn mark_error(&self, id: ExecutionId, message: &str) -> ExecutionStoreResult<()> {
        let now = self.clock.utc();
        let status_message = message.to_owned();
        self.run_blocking(move |connection| {
            let updated = diesel::update(executions::table.filter(executions::id.eq(id.value())))
                .set((
                    executions::status.eq(ExecutionStatus::Error.as_str()),
                    executions::status_message.eq(&status_message),
                    executions::end_time.eq(Some(now)),
                    executions::update_time.eq(now),
                ))
                .execute(connection)
                .map_err(ExecutionStoreError::persistence)?;
            if updated == 0 {
                return Err(ExecutionStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn update_extra_attributes(
        &self,
        id: ExecutionId,
        attributes: &ExtraAttributes,
    ) -> ExecutionStoreResult<()> {
        let now = self.clock.utc();
        let update = attributes.clone();
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                let stored = executions::table
                    .filter(executions::id.eq(id.value()))
                    .select(executions::extra_attrs)
                    .for_update()
                    .first::<serde_json::Value>(tx)
                    .optional()?
                    .ok_or(TransactionError::Store(ExecutionStoreError::NotFound(id)))?;

                let mut merged = serde_json::from_value::<ExtraAttributes>(stored)
                    .map_err(|err| TransactionError::Store(ExecutionStoreError::persistence(err)))?;
                merged.merge(&update);
                let payload = serde_json::to_value(&merged)
                    .map_err(|err| TransactionError::Store(ExecutionStoreError::persistence(err)))?;

                diesel::update(executions::table.filter(executions::id.eq(id.value())))
                    .set((
                        executions::extra_attrs.eq(payload),
                        executions::update_time.eq(now),
                    ))
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }
}

#[async_trait]
impl<C> TaskStore for PostgresJobStore<C>
where
    C: Clock + Send + Sync,
{
    async fn create(&self, execution_id: ExecutionId, job: &JobSpec) -> TaskStoreResult<TaskId> {
        let new_row = to_new_task_row(execution_id, job, self.clock.utc());
        self.run_blocking(move |connection| {
            let id = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(tasks::id)
                .get_result::<i64>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskStoreError::ExecutionNotFound(execution_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            TaskId::new(id).map_err(TaskStoreError::persistence)
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskStoreResult<Vec<Task>> {
        let vendor_type = query.vendor_type().map(|vendor| vendor.as_str().to_owned());
        let execution_id = query.execution_id();
        let order = query.order();

        self.run_blocking(move |connection| {
            let mut statement = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(vendor) = vendor_type {
                statement = statement.filter(tasks::vendor_type.eq(vendor));
            }
            if let Some(execution) = execution_id {
                statement = statement.filter(tasks::execution_id.eq(execution.value()));
            }
            statement = match order {
                IdOrder::Ascending => statement.order(tasks::id.asc()),
                IdOrder::Descending => statement.order(tasks::id.desc()),
            };

            let rows = statement
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn load_execution_status(
    connection: &mut PgConnection,
    id: ExecutionId,
) -> ExecutionStoreResult<ExecutionStatus> {
    let status = executions::table
        .filter(executions::id.eq(id.value()))
        .select(executions::status)
        .first::<String>(connection)
        .optional()
        .map_err(ExecutionStoreError::persistence)?
        .ok_or(ExecutionStoreError::NotFound(id))?;
    ExecutionStatus::try_from(status.as_str()).map_err(ExecutionStoreError::persistence)
}

/// Re-derives the execution status from its tasks; an execution without
/// tasks is stopped directly.
fn refresh_execution_status(
    connection: &mut PgConnection,
    id: ExecutionId,
    now: DateTime<Utc>,
) -> Result<(), TransactionError<ExecutionStoreError>> {
    let persisted = tasks::table
        .filter(tasks::execution_id.eq(id.value()))
        .select(tasks::status)
        .load::<String>(connection)?;
    let statuses = persisted
        .iter()
        .map(|status| TaskStatus::try_from(status.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| TransactionError::Store(ExecutionStoreError::persistence(err)))?;

    let target = ExecutionStatus::aggregate(statuses).unwrap_or(ExecutionStatus::Stopped);
    let end_time = target.is_final().then_some(now);
    diesel::update(
        executions::table
            .filter(executions::id.eq(id.value()))
            .filter(executions::status.eq_any(UNFINISHED_STATUSES))
            .filter(executions::status.ne(target.as_str())),
    )
    .set((
        executions::status.eq(target.as_str()),
        executions::end_time.eq(end_time),
        executions::update_time.eq(now),
    ))
    .execute(connection)?;
    Ok(())
}

fn to_new_execution_row(
    execution: &NewExecution,
    now: DateTime<Utc>,
) -> ExecutionStoreResult<NewExecutionRow> {
    let extra_attrs = serde_json::to_value(&execution.extra_attributes)
        .map_err(ExecutionStoreError::persistence)?;
    Ok(NewExecutionRow {
        vendor_type: execution.vendor_type.as_str().to_owned(),
        vendor_id: execution.owner_id.value(),
        status: ExecutionStatus::Pending.as_str().to_owned(),
        status_message: String::new(),
        trigger: execution.trigger.as_str().to_owned(),
        extra_attrs,
        start_time: now,
        update_time: now,
    })
}

fn row_to_execution(row: ExecutionRow) -> ExecutionStoreResult<Execution> {
    let ExecutionRow {
        id,
        vendor_type,
        vendor_id,
        status,
        status_message,
        trigger,
        extra_attrs,
        start_time,
        end_time,
        update_time,
    } = row;

    let data = PersistedExecutionData {
        id: ExecutionId::new(id).map_err(ExecutionStoreError::persistence)?,
        vendor_type: VendorType::new(vendor_type).map_err(ExecutionStoreError::persistence)?,
        owner_id: OwnerId::new(vendor_id),
        status: ExecutionStatus::try_from(status.as_str())
            .map_err(ExecutionStoreError::persistence)?,
        status_message,
        trigger: ExecutionTrigger::try_from(trigger.as_str())
            .map_err(ExecutionStoreError::persistence)?,
        extra_attributes: serde_json::from_value(extra_attrs)
            .map_err(ExecutionStoreError::persistence)?,
        start_time,
        end_time,
        update_time,
    };
    Ok(Execution::from_persisted(data))
}

fn to_new_task_row(execution_id: ExecutionId, job: &JobSpec, now: DateTime<Utc>) -> NewTaskRow {
    NewTaskRow {
        execution_id: execution_id.value(),
        vendor_type: job.name().as_str().to_owned(),
        job_kind: job.kind().as_str().to_owned(),
        parameters: serde_json::Value::Object(job.parameters().clone()),
        status: TaskStatus::Pending.as_str().to_owned(),
        status_message: String::new(),
        creation_time: now,
        update_time: now,
    }
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        execution_id,
        vendor_type,
        job_kind,
        parameters,
        status,
        status_message,
        creation_time,
        end_time,
        update_time,
    } = row;

    let serde_json::Value::Object(parameter_map) = parameters else {
        return Err(TaskStoreError::persistence(std::io::Error::other(format!(
            "task {id} parameters are not a JSON object"
        ))));
    };
    let job = JobSpec::new(
        VendorType::new(vendor_type).map_err(TaskStoreError::persistence)?,
        JobKind::try_from(job_kind.as_str()).map_err(TaskStoreError::persistence)?,
        parameter_map,
    );

    let data = PersistedTaskData {
        id: TaskId::new(id).map_err(TaskStoreError::persistence)?,
        execution_id: ExecutionId::new(execution_id).map_err(TaskStoreError::persistence)?,
        job,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskStoreError::persistence)?,
        status_message,
        creation_time,
        end_time,
        update_time,
    };
    Ok(Task::from_persisted(data))
}
