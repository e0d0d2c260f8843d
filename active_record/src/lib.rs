//! Active Record - mapping and statement engine for rowhaus
//!
//! This crate turns entities into column bindings, column bindings into
//! statements, and hands statements to an injected [`Executor`]. Entities
//! embed a [`RecordCore`] and get their lifecycle operations from the
//! [`Persistable`] trait.

// Lets `#[derive(Entity)]` output resolve `active_record::...` inside this crate's own tests
extern crate self as active_record;

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod binding;
pub mod descriptor;
pub mod errors;
pub mod executor;
pub mod gateway;
pub mod introspect;
pub mod prelude;
pub mod record;
pub mod statement;
pub mod traits;

pub use binding::{ColumnBinding, Row};
pub use descriptor::TableDescriptor;
pub use errors::{ExecutorError, StoreError};
pub use executor::{default_executor, ExecutionOutcome, Executor, LogExecutor, MemoryExecutor};
#[cfg(feature = "postgres")]
pub use executor::PgExecutor;
pub use gateway::TableGateway;
pub use record::{EntityState, RecordCore};
pub use statement::{Statement, StatementBuilder, StatementKind};
pub use traits::{Entity, FieldDescriptor, Persistable};

pub use config::{MapperConfig, PlaceholderStyle, UnsetPolicy};
pub use type_mapping::{ColumnValue, FromColumnValue, MappingError, ToColumnValue, ValidationError};
