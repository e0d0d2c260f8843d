//! # RowHaus
//!
//! Active-record persistence for plain Rust structs: derive `Entity`, embed a
//! `RecordCore`, and the entity can create, update, delete and load itself
//! through whatever executor it was bound to.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowhaus::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Entity)]
//! pub struct Invoice {
//!     id: Option<i64>,
//!     customer: Option<String>,
//!     total: Option<i64>,
//!     record: RecordCore,
//! }
//!
//! fn main() -> Result<(), StoreError> {
//!     let executor = Arc::new(MemoryExecutor::new());
//!     let rowhaus = RowHaus::new(executor.clone());
//!
//!     let mut invoice: Invoice = rowhaus.entity();
//!     invoice.customer = Some("acme".to_string());
//!     invoice.total = Some(1200);
//!     invoice.create()?;
//!
//!     let id = invoice.identity().copied().unwrap_or_default();
//!     let stored: Invoice = rowhaus.find(&id)?;
//!     assert_eq!(stored.total, Some(1200));
//!     Ok(())
//! }
//! ```

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

pub mod core;
pub mod errors;
pub mod orders;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::RowHaus;
pub use errors::RowHausError;
pub use orders::Orders;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, MapperConfig, PlaceholderStyle, UnsetPolicy};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated derive code to work correctly
pub use active_record;
pub use table_derive;
pub use type_mapping;
