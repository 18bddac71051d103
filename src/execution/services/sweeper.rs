//! Retention sweeping for finished executions.

use crate::execution::{
    domain::{ExecutionId, ExecutionQuery, VendorType},
    ports::{ExecutionStore, ExecutionStoreError},
};
use std::sync::Arc;

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Executions removed by the sweep.
    pub deleted: Vec<ExecutionId>,
    /// Executions the store refused or failed to delete.
    pub failed: Vec<ExecutionId>,
}

/// Keeps the newest finished executions of one job kind and deletes the rest.
///
/// Unfinished executions are never swept.
#[derive(Clone)]
pub struct ExecutionSweeper<E>
where
    E: ExecutionStore,
{
    executions: Arc<E>,
    vendor_type: VendorType,
    retain: usize,
}

impl<E> ExecutionSweeper<E>
where
    E: ExecutionStore,
{
    /// Creates a sweeper retaining `retain` finished executions of
    /// `vendor_type`.
    #[must_use]
    pub const fn new(executions: Arc<E>, vendor_type: VendorType, retain: usize) -> Self {
        Self {
            executions,
            vendor_type,
            retain,
        }
    }

    /// Returns the number of finished executions kept per sweep.
    #[must_use]
    pub const fn retain(&self) -> usize {
        self.retain
    }

    /// Deletes finished executions beyond the retention count, oldest first.
    ///
    /// Individual delete failures are logged and reported without stopping
    /// the sweep.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError`] when listing executions fails.
    pub async fn sweep(&self) -> Result<SweepReport, ExecutionStoreError> {
        let query = ExecutionQuery::new().with_vendor_type(self.vendor_type.clone());
        let candidates: Vec<ExecutionId> = self
            .executions
            .list(&query)
            .await?
            .iter()
            .rev()
            .filter(|execution| execution.status().is_final())
            .skip(self.retain)
            .map(|execution| execution.id())
            .collect();

        let mut report = SweepReport::default();
        for id in candidates {
            match self.executions.delete(id).await {
                Ok(()) => report.deleted.push(id),
                Err(err) => {
                    tracing::warn!(
                        execution_id = %id,
                        vendor_type = %self.vendor_type,
                        error = %err,
                        "failed to sweep execution"
                    );
                    report.failed.push(id);
                }
            }
        }

        if !report.deleted.is_empty() {
            tracing::info!(
                vendor_type = %self.vendor_type,
                deleted = report.deleted.len(),
                "swept finished executions"
            );
        }
        Ok(report)
    }
}
