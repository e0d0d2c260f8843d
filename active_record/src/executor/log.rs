use super::{ExecutionOutcome, Executor};
use crate::binding::Row;
use crate::errors::ExecutorError;
use crate::statement::Statement;

/// Executor that only reports what it was asked to run
///
/// Every insert, update or delete counts as one affected row and no identity
/// is generated, so entities created through it stay transient until the
/// caller assigns an identity. Lookups never find anything.
#[derive(Debug, Clone, Default)]
pub struct LogExecutor;

impl LogExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for LogExecutor {
    fn execute(&self, statement: &Statement) -> Result<ExecutionOutcome, ExecutorError> {
        tracing::info!(
            table = statement.table().name(),
            kind = %statement.kind(),
            "Executed: {}",
            statement
        );
        Ok(ExecutionOutcome::affected(1))
    }

    fn fetch_one(&self, statement: &Statement) -> Result<Option<Row>, ExecutorError> {
        tracing::info!(
            table = statement.table().name(),
            kind = %statement.kind(),
            "Executed: {}",
            statement
        );
        Ok(None)
    }
}
