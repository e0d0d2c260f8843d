//! Column bindings and fetched rows

use serde::{Deserialize, Serialize};
use type_mapping::{ColumnValue, MappingError};

/// A (column, value) pair derived from one persistable field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBinding {
    column: String,
    value: ColumnValue,
}

impl ColumnBinding {
    pub fn new(column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self) -> &ColumnValue {
        &self.value
    }

    pub fn into_parts(self) -> (String, ColumnValue) {
        (self.column, self.value)
    }
}

/// One row returned by an executor, columns in projection order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<ColumnBinding>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|binding| binding.column == column)
            .map(|binding| &binding.value)
    }

    /// Like [`Row::get`] but a missing column is a mapping error
    pub fn require(&self, column: &str) -> Result<&ColumnValue, MappingError> {
        self.get(column).ok_or_else(|| MappingError::MissingColumn {
            column: column.to_string(),
        })
    }

    /// Replace the value of `column`, appending it when absent
    pub fn set(&mut self, column: &str, value: ColumnValue) {
        match self.columns.iter_mut().find(|b| b.column == column) {
            Some(binding) => binding.value = value,
            None => self.columns.push(ColumnBinding::new(column, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnBinding> {
        self.columns.iter()
    }
}

impl From<Vec<ColumnBinding>> for Row {
    fn from(columns: Vec<ColumnBinding>) -> Self {
        Self { columns }
    }
}

impl FromIterator<ColumnBinding> for Row {
    fn from_iter<I: IntoIterator<Item = ColumnBinding>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_set_replaces_in_place() {
        let mut row: Row = vec![
            ColumnBinding::new("id", 1i64),
            ColumnBinding::new("quantity", 2),
        ]
        .into();
        row.set("quantity", ColumnValue::Integer(5));
        row.set("item_price", ColumnValue::BigInt(100));

        let columns: Vec<_> = row.iter().map(|b| b.column()).collect();
        assert_eq!(columns, vec!["id", "quantity", "item_price"]);
        assert_eq!(row.get("quantity"), Some(&ColumnValue::Integer(5)));
    }

    #[test]
    fn test_require_reports_missing_column() {
        let row = Row::new();
        assert_eq!(
            row.require("item_id"),
            Err(MappingError::MissingColumn {
                column: "item_id".to_string()
            })
        );
    }
}
