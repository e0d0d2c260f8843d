//! Convenience re-exports for common active-record usage

// Core traits
pub use crate::traits::{Entity, FieldDescriptor, Persistable};

// Entity building blocks
pub use crate::record::{EntityState, RecordCore};
pub use crate::gateway::TableGateway;
pub use crate::descriptor::TableDescriptor;

// Statements and their execution
pub use crate::statement::{Statement, StatementBuilder, StatementKind};
pub use crate::binding::{ColumnBinding, Row};
pub use crate::executor::{default_executor, ExecutionOutcome, Executor, LogExecutor, MemoryExecutor};
#[cfg(feature = "postgres")]
pub use crate::executor::PgExecutor;

// Error types
pub use crate::errors::{ExecutorError, StoreError};

// Value mapping
pub use type_mapping::{ColumnValue, FromColumnValue, MappingError, ToColumnValue};
pub use config::{MapperConfig, UnsetPolicy};
