//! Statement construction and rendering
//!
//! A [`Statement`] is immutable once built and can only be produced by the
//! [`StatementBuilder`], which guarantees that inserts and updates carry at
//! least one column and that every keyed statement carries an identity.
//!
//! Values never end up in statement text unescaped: executors use
//! [`Statement::to_sql`] with positional placeholders, while the `Display`
//! form renders escaped literals for logs and diagnostics.

use crate::binding::ColumnBinding;
use crate::descriptor::TableDescriptor;
use crate::errors::StoreError;
use crate::trace_log;
use config::{MapperConfig, PlaceholderStyle, UnsetPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use type_mapping::{render_literal, validate_identifier, ColumnValue, MappingError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
    Select,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Select => "SELECT",
        })
    }
}

/// One data-modification (or lookup) operation against a single table
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    table: TableDescriptor,
    bindings: Vec<ColumnBinding>,
    projection: Vec<String>,
    identity: Option<ColumnValue>,
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn table(&self) -> &TableDescriptor {
        &self.table
    }

    /// Columns written by an insert or update, in binding order
    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    /// Columns read by a select, identity column first
    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    /// Identity the statement is keyed by (update, delete, select)
    pub fn identity(&self) -> Option<&ColumnValue> {
        self.identity.as_ref()
    }

    /// Identity an insert writes itself; the executor generates one otherwise
    pub fn supplied_identity(&self) -> Option<&ColumnValue> {
        if self.kind != StatementKind::Insert {
            return None;
        }
        let id_column = self.table.identity_column();
        self.bindings
            .iter()
            .find(|b| b.column() == id_column && !b.value().is_absent())
            .map(|b| b.value())
    }

    /// Render with positional placeholders; returns the text and its parameters in order
    ///
    /// NULL values are written as literals and take no parameter. Decimals
    /// travel as text and are cast to NUMERIC in the statement.
    pub fn to_sql(&self, style: PlaceholderStyle) -> (String, Vec<ColumnValue>) {
        let mut params = Vec::with_capacity(self.bindings.len() + 1);
        let sql = self.render(|value| {
            // An untyped NULL literal fits any column; a bound NULL carries a parameter type
            if value.is_absent() {
                return "NULL".to_string();
            }
            params.push(value.clone());
            let placeholder = style.placeholder(params.len());
            match value {
                ColumnValue::Decimal(_) => format!("CAST({} AS NUMERIC)", placeholder),
                _ => placeholder,
            }
        });
        (sql, params)
    }

    fn render(&self, mut value: impl FnMut(&ColumnValue) -> String) -> String {
        let table = self.table.name();
        let id_column = self.table.identity_column();

        match self.kind {
            StatementKind::Insert => {
                let columns: Vec<&str> = self.bindings.iter().map(|b| b.column()).collect();
                let values: Vec<String> = self.bindings.iter().map(|b| value(b.value())).collect();
                format!(
                    "INSERT INTO {} ({}) VALUES ({});",
                    table,
                    columns.join(", "),
                    values.join(", ")
                )
            }
            StatementKind::Update => {
                let assignments: Vec<String> = self
                    .bindings
                    .iter()
                    .map(|b| format!("{} = {}", b.column(), value(b.value())))
                    .collect();
                format!(
                    "UPDATE {} SET {} WHERE {} = {};",
                    table,
                    assignments.join(", "),
                    id_column,
                    value(self.identity_or_null())
                )
            }
            StatementKind::Delete => format!(
                "DELETE FROM {} WHERE {} = {};",
                table,
                id_column,
                value(self.identity_or_null())
            ),
            StatementKind::Select => format!(
                "SELECT {} FROM {} WHERE {} = {};",
                self.projection.join(", "),
                table,
                id_column,
                value(self.identity_or_null())
            ),
        }
    }

    // Keyed statements always carry an identity; the builder enforces it
    fn identity_or_null(&self) -> &ColumnValue {
        self.identity.as_ref().unwrap_or(&ColumnValue::Null)
    }
}

/// Text form with escaped literals
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(render_literal))
    }
}

/// Builds statements for a table and applies the unset-field policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementBuilder {
    unset_policy: UnsetPolicy,
}

impl StatementBuilder {
    pub fn new(unset_policy: UnsetPolicy) -> Self {
        Self { unset_policy }
    }

    pub fn from_config(config: &MapperConfig) -> Self {
        Self::new(config.unset_policy)
    }

    pub fn unset_policy(&self) -> UnsetPolicy {
        self.unset_policy
    }

    /// `INSERT INTO <table> (<columns>) VALUES (<values>);`
    pub fn build_insert(
        &self,
        table: &TableDescriptor,
        bindings: Vec<ColumnBinding>,
    ) -> Result<Statement, StoreError> {
        let bindings = self.resolve(table, bindings, StatementKind::Insert)?;
        trace_log!("[INSERT] table={} columns={}", table, bindings.len());
        Ok(Statement {
            kind: StatementKind::Insert,
            table: table.clone(),
            bindings,
            projection: Vec::new(),
            identity: None,
        })
    }

    /// `UPDATE <table> SET <column> = <value>, ... WHERE <identity column> = <identity>;`
    pub fn build_update(
        &self,
        table: &TableDescriptor,
        identity: Option<ColumnValue>,
        bindings: Vec<ColumnBinding>,
    ) -> Result<Statement, StoreError> {
        let identity = Self::require_identity(table, identity, StatementKind::Update)?;
        let bindings = self.resolve(table, bindings, StatementKind::Update)?;
        trace_log!("[UPDATE] table={} columns={}", table, bindings.len());
        Ok(Statement {
            kind: StatementKind::Update,
            table: table.clone(),
            bindings,
            projection: Vec::new(),
            identity: Some(identity),
        })
    }

    /// `DELETE FROM <table> WHERE <identity column> = <identity>;`
    pub fn build_delete(
        &self,
        table: &TableDescriptor,
        identity: Option<ColumnValue>,
    ) -> Result<Statement, StoreError> {
        let identity = Self::require_identity(table, identity, StatementKind::Delete)?;
        Ok(Statement {
            kind: StatementKind::Delete,
            table: table.clone(),
            bindings: Vec::new(),
            projection: Vec::new(),
            identity: Some(identity),
        })
    }

    /// `SELECT <identity column>, <columns> FROM <table> WHERE <identity column> = <identity>;`
    pub fn build_select(
        &self,
        table: &TableDescriptor,
        identity: Option<ColumnValue>,
        columns: &[&str],
    ) -> Result<Statement, StoreError> {
        let identity = Self::require_identity(table, identity, StatementKind::Select)?;
        let mut projection = Vec::with_capacity(columns.len() + 1);
        projection.push(table.identity_column().to_string());
        for column in columns {
            validate_identifier(column)?;
            if *column != table.identity_column() {
                projection.push(column.to_string());
            }
        }
        Ok(Statement {
            kind: StatementKind::Select,
            table: table.clone(),
            bindings: Vec::new(),
            projection,
            identity: Some(identity),
        })
    }

    fn require_identity(
        table: &TableDescriptor,
        identity: Option<ColumnValue>,
        operation: StatementKind,
    ) -> Result<ColumnValue, StoreError> {
        match identity {
            Some(value) if !value.is_absent() => Ok(value),
            _ => Err(StoreError::MissingIdentity {
                table: table.name().to_string(),
                operation,
            }),
        }
    }

    /// Validate column names, apply the unset policy, and refuse an empty result
    ///
    /// `Omit` only narrows inserts, where the column default applies. An
    /// update writes an unset field as NULL, so clearing a field is stored.
    fn resolve(
        &self,
        table: &TableDescriptor,
        bindings: Vec<ColumnBinding>,
        kind: StatementKind,
    ) -> Result<Vec<ColumnBinding>, StoreError> {
        let mut resolved = Vec::with_capacity(bindings.len());
        for binding in bindings {
            validate_identifier(binding.column())?;
            if !binding.value().is_unset() {
                resolved.push(binding);
                continue;
            }
            match self.unset_policy {
                UnsetPolicy::Omit if kind == StatementKind::Insert => {}
                UnsetPolicy::Omit | UnsetPolicy::Null => {
                    let (column, _) = binding.into_parts();
                    resolved.push(ColumnBinding::new(column, ColumnValue::Null));
                }
                UnsetPolicy::Reject => {
                    return Err(MappingError::Unset {
                        column: binding.column().to_string(),
                    }
                    .into())
                }
            }
        }

        if resolved.is_empty() {
            return Err(StoreError::EmptyBindings {
                table: table.name().to_string(),
            });
        }
        Ok(resolved)
    }
}
