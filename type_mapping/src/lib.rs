//! Unified value mapping between Rust field types and relational columns
//! This crate provides the transport-safe value model used across the rowhaus ecosystem

pub mod convert;
pub mod errors;
pub mod sql;
pub mod types;
pub mod validate;

pub use convert::{FromColumnValue, ToColumnValue};
pub use errors::MappingError;
pub use sql::{escape_string_literal, render_literal};
pub use types::ColumnValue;
pub use validate::{validate_identifier, ValidationError};
