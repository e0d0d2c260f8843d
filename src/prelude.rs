//! Convenience re-exports for common RowHaus usage
//!
//! # Example
//!
//! ```rust
//! use rowhaus::prelude::*;
//! ```

// Core RowHaus components
pub use crate::core::RowHaus;
pub use crate::errors::RowHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, MapperConfig, PlaceholderStyle, UnsetPolicy};

// Entity traits, building blocks and executors
pub use active_record::prelude::*;

// Re-export active_record module for derive-generated code
pub use active_record;

// Re-export the entity derive
pub use table_derive::Entity;

// Column types entities commonly hold
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
