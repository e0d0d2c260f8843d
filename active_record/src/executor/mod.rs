//! Execution collaborators
//!
//! An [`Executor`] is the only boundary between rowhaus and real storage. It
//! receives finished statements and owns every timeout, retry and
//! backpressure decision.

mod log;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use log::LogExecutor;
pub use memory::{MemoryExecutor, MemoryExecutorError};
#[cfg(feature = "postgres")]
pub use postgres::{PgExecutor, PgExecutorError};

use crate::binding::Row;
use crate::errors::ExecutorError;
use crate::statement::Statement;
use std::sync::Arc;
use type_mapping::ColumnValue;

/// Result of executing an insert, update or delete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOutcome {
    pub rows_affected: u64,
    /// Identity assigned by storage to a freshly inserted row
    pub generated_identity: Option<ColumnValue>,
}

impl ExecutionOutcome {
    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            generated_identity: None,
        }
    }

    pub fn with_identity(mut self, identity: ColumnValue) -> Self {
        self.generated_identity = Some(identity);
        self
    }
}

/// Synchronous capability to run statements against storage
pub trait Executor: Send + Sync {
    /// Run an insert, update or delete
    fn execute(&self, statement: &Statement) -> Result<ExecutionOutcome, ExecutorError>;

    /// Run a select keyed by identity, returning at most one row
    fn fetch_one(&self, statement: &Statement) -> Result<Option<Row>, ExecutorError>;
}

impl<T: Executor + ?Sized> Executor for Arc<T> {
    fn execute(&self, statement: &Statement) -> Result<ExecutionOutcome, ExecutorError> {
        (**self).execute(statement)
    }

    fn fetch_one(&self, statement: &Statement) -> Result<Option<Row>, ExecutorError> {
        (**self).fetch_one(statement)
    }
}

/// Executor used when an entity is constructed without one
pub fn default_executor() -> Arc<dyn Executor> {
    Arc::new(LogExecutor::new())
}
