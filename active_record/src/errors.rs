//! Error types for entity persistence
//!
//! Every failure is returned to the direct caller. Nothing in this crate
//! retries or swallows an error; retry policy belongs to the executor.

use crate::statement::{Statement, StatementKind};
use thiserror::Error;
use type_mapping::{MappingError, ValidationError};

/// Error type an [`Executor`](crate::Executor) reports back
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No persistable columns to write to table '{table}'")]
    EmptyBindings { table: String },

    #[error("{operation} on table '{table}' requires an identity")]
    MissingIdentity {
        table: String,
        operation: StatementKind,
    },

    #[error("{operation} on table '{table}' attempted on a deleted entity")]
    StaleEntity {
        table: String,
        operation: StatementKind,
    },

    #[error("{entity}.{field} must be set before it can be used")]
    IncompleteState {
        entity: &'static str,
        field: &'static str,
    },

    #[error("No row in table '{table}' with identity {identity}")]
    NotFound { table: String, identity: String },

    #[error("Executing `{statement}` failed: {source}")]
    Execution {
        statement: Box<Statement>,
        #[source]
        source: ExecutorError,
    },

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValidationError),

    #[error("Entity is already persisted in table '{table}'")]
    AlreadyPersisted { table: String },

    #[error("{entity}: {computation} overflowed")]
    Overflow {
        entity: &'static str,
        computation: &'static str,
    },
}

impl StoreError {
    pub fn execution(statement: Statement, source: ExecutorError) -> Self {
        StoreError::Execution {
            statement: Box::new(statement),
            source,
        }
    }

    /// Statement that was being executed, for execution failures
    pub fn statement(&self) -> Option<&Statement> {
        match self {
            StoreError::Execution { statement, .. } => Some(statement),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
