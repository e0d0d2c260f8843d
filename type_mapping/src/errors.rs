//! Error types for value mapping
//!
//! Conversions do not know which column they serve, so errors start with an
//! empty column name and the caller attaches it with [`MappingError::for_column`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("Column '{column}' is unset and the unset policy rejects it")]
    Unset { column: String },

    #[error("Column '{column}': {value} does not fit into {target}")]
    OutOfRange {
        column: String,
        target: &'static str,
        value: String,
    },

    #[error("Column '{column}': non-finite float {value} has no SQL representation")]
    NonFinite { column: String, value: f64 },

    #[error("Column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Column '{column}' is missing from the fetched row")]
    MissingColumn { column: String },

    #[error("Field registry of {entity} lists {expected} columns but {found} values were extracted")]
    RegistryMismatch {
        entity: &'static str,
        expected: usize,
        found: usize,
    },
}

impl MappingError {
    pub fn out_of_range(target: &'static str, value: impl ToString) -> Self {
        MappingError::OutOfRange {
            column: String::new(),
            target,
            value: value.to_string(),
        }
    }

    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        MappingError::TypeMismatch {
            column: String::new(),
            expected,
            found,
        }
    }

    /// Attach the column name to an error raised by a bare value conversion
    pub fn for_column(self, name: &str) -> Self {
        let column = name.to_string();
        match self {
            MappingError::Unset { .. } => MappingError::Unset { column },
            MappingError::OutOfRange { target, value, .. } => MappingError::OutOfRange {
                column,
                target,
                value,
            },
            MappingError::NonFinite { value, .. } => MappingError::NonFinite { column, value },
            MappingError::TypeMismatch {
                expected, found, ..
            } => MappingError::TypeMismatch {
                column,
                expected,
                found,
            },
            MappingError::MissingColumn { .. } => MappingError::MissingColumn { column },
            other @ MappingError::RegistryMismatch { .. } => other,
        }
    }

    /// Column the error refers to, empty when not yet attached
    pub fn column(&self) -> &str {
        match self {
            MappingError::Unset { column }
            | MappingError::OutOfRange { column, .. }
            | MappingError::NonFinite { column, .. }
            | MappingError::TypeMismatch { column, .. }
            | MappingError::MissingColumn { column } => column,
            MappingError::RegistryMismatch { .. } => "",
        }
    }
}
