//! Error types for the RowHaus crate
//!
//! This module contains the errors the coordinator adds on top of the
//! per-operation `StoreError`.

use active_record::StoreError;
use config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowHausError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[cfg(feature = "postgres")]
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] active_record::executor::PgExecutorError),

    #[error("A [database] section is configured but rowhaus was built without the `postgres` feature")]
    DatabaseUnavailable,
}
