//! Column value definitions
//!
//! This module provides the transport-safe representation every persistable
//! field is normalized to before it reaches a statement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A single column value as it travels from an entity field to an executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValue {
    Text(String),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Decimal(String), // Store as string to preserve precision
    Json(serde_json::Value),
    Null,
    /// The field was never assigned. Distinct from `Null` so the statement
    /// builder can apply an explicit policy instead of coercing it.
    Unset,
}

impl ColumnValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, ColumnValue::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// True for values that cannot identify a row
    pub fn is_absent(&self) -> bool {
        matches!(self, ColumnValue::Null | ColumnValue::Unset)
    }

    /// Short name of the variant, used in mapping diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Text(_) => "text",
            ColumnValue::SmallInt(_) => "smallint",
            ColumnValue::Integer(_) => "integer",
            ColumnValue::BigInt(_) => "bigint",
            ColumnValue::Float(_) => "float",
            ColumnValue::Boolean(_) => "boolean",
            ColumnValue::Uuid(_) => "uuid",
            ColumnValue::Timestamp(_) => "timestamp",
            ColumnValue::Decimal(_) => "decimal",
            ColumnValue::Json(_) => "json",
            ColumnValue::Null => "null",
            ColumnValue::Unset => "unset",
        }
    }
}

/// Renders the escaped SQL literal form
impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::sql::render_literal(self))
    }
}

impl From<String> for ColumnValue {
    fn from(val: String) -> Self {
        ColumnValue::Text(val)
    }
}

impl From<&str> for ColumnValue {
    fn from(val: &str) -> Self {
        ColumnValue::Text(val.to_string())
    }
}

impl From<i16> for ColumnValue {
    fn from(val: i16) -> Self {
        ColumnValue::SmallInt(val)
    }
}

impl From<i32> for ColumnValue {
    fn from(val: i32) -> Self {
        ColumnValue::Integer(val)
    }
}

impl From<i64> for ColumnValue {
    fn from(val: i64) -> Self {
        ColumnValue::BigInt(val)
    }
}

impl From<bool> for ColumnValue {
    fn from(val: bool) -> Self {
        ColumnValue::Boolean(val)
    }
}

impl From<Uuid> for ColumnValue {
    fn from(val: Uuid) -> Self {
        ColumnValue::Uuid(val)
    }
}

impl From<DateTime<Utc>> for ColumnValue {
    fn from(val: DateTime<Utc>) -> Self {
        ColumnValue::Timestamp(val)
    }
}

impl From<serde_json::Value> for ColumnValue {
    fn from(val: serde_json::Value) -> Self {
        ColumnValue::Json(val)
    }
}
