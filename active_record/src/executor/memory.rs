//! In-process executor
//!
//! Keeps one map of rows per table, keyed by the rendered identity literal so
//! that `Integer(1)` and `BigInt(1)` address the same row. Inserts that do not
//! name the identity column get the next value of a per-table sequence.

use super::{ExecutionOutcome, Executor};
use crate::binding::{ColumnBinding, Row};
use crate::errors::ExecutorError;
use crate::statement::{Statement, StatementKind};
use crate::trace_log;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use type_mapping::{render_literal, ColumnValue};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryExecutorError {
    #[error("Table '{table}' already has a row with identity {identity}")]
    DuplicateIdentity { table: String, identity: String },

    #[error("{kind} statements must go through {expected}")]
    WrongEntryPoint {
        kind: StatementKind,
        expected: &'static str,
    },

    #[error("{0}")]
    Injected(String),
}

#[derive(Debug, Default)]
struct MemoryTable {
    last_identity: i64,
    rows: BTreeMap<String, Row>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, MemoryTable>,
    journal: Vec<Statement>,
    pending_failure: Option<String>,
}

/// Executor backed by in-memory tables, for tests and demos
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    state: Mutex<MemoryState>,
}

fn identity_key(value: &ColumnValue) -> String {
    render_literal(value)
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock cannot leave a row half written
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the next `execute` or `fetch_one` call fail with `message`
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().pending_failure = Some(message.into());
    }

    /// Every statement received so far, in order
    pub fn statements(&self) -> Vec<Statement> {
        self.lock().journal.clone()
    }

    /// Current content of the row keyed by `identity`
    pub fn row(&self, table: &str, identity: &ColumnValue) -> Option<Row> {
        self.lock()
            .tables
            .get(table)
            .and_then(|t| t.rows.get(&identity_key(identity)))
            .cloned()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.lock().tables.get(table).map_or(0, |t| t.rows.len())
    }

    fn record(state: &mut MemoryState, statement: &Statement) -> Result<(), MemoryExecutorError> {
        state.journal.push(statement.clone());
        match state.pending_failure.take() {
            Some(message) => Err(MemoryExecutorError::Injected(message)),
            None => Ok(()),
        }
    }

    fn insert(
        state: &mut MemoryState,
        statement: &Statement,
    ) -> Result<ExecutionOutcome, MemoryExecutorError> {
        let descriptor = statement.table();
        let id_column = descriptor.identity_column();
        let table = state.tables.entry(descriptor.name().to_string()).or_default();

        let (identity, generated) = match statement.supplied_identity() {
            Some(value) => (value.clone(), false),
            None => {
                table.last_identity += 1;
                (ColumnValue::BigInt(table.last_identity), true)
            }
        };

        let key = identity_key(&identity);
        if table.rows.contains_key(&key) {
            return Err(MemoryExecutorError::DuplicateIdentity {
                table: descriptor.name().to_string(),
                identity: key,
            });
        }

        let mut row = Row::from(vec![ColumnBinding::new(id_column, identity.clone())]);
        for binding in statement.bindings() {
            if binding.column() != id_column {
                row.set(binding.column(), binding.value().clone());
            }
        }
        table.rows.insert(key, row);

        let outcome = ExecutionOutcome::affected(1);
        Ok(if generated {
            outcome.with_identity(identity)
        } else {
            outcome
        })
    }

    fn update(state: &mut MemoryState, statement: &Statement) -> ExecutionOutcome {
        let Some(identity) = statement.identity() else {
            return ExecutionOutcome::affected(0);
        };
        let key = identity_key(identity);
        let row = state
            .tables
            .get_mut(statement.table().name())
            .and_then(|t| t.rows.get_mut(&key));

        match row {
            Some(row) => {
                for binding in statement.bindings() {
                    row.set(binding.column(), binding.value().clone());
                }
                ExecutionOutcome::affected(1)
            }
            None => ExecutionOutcome::affected(0),
        }
    }

    fn delete(state: &mut MemoryState, statement: &Statement) -> ExecutionOutcome {
        let Some(identity) = statement.identity() else {
            return ExecutionOutcome::affected(0);
        };
        let key = identity_key(identity);
        let removed = state
            .tables
            .get_mut(statement.table().name())
            .and_then(|t| t.rows.remove(&key));
        ExecutionOutcome::affected(u64::from(removed.is_some()))
    }
}

impl Executor for MemoryExecutor {
    fn execute(&self, statement: &Statement) -> Result<ExecutionOutcome, ExecutorError> {
        let mut state = self.lock();
        Self::record(&mut state, statement)?;
        trace_log!("[MEMORY] {}", statement);

        let outcome = match statement.kind() {
            StatementKind::Insert => Self::insert(&mut state, statement)?,
            StatementKind::Update => Self::update(&mut state, statement),
            StatementKind::Delete => Self::delete(&mut state, statement),
            StatementKind::Select => {
                return Err(MemoryExecutorError::WrongEntryPoint {
                    kind: StatementKind::Select,
                    expected: "fetch_one",
                }
                .into())
            }
        };
        Ok(outcome)
    }

    fn fetch_one(&self, statement: &Statement) -> Result<Option<Row>, ExecutorError> {
        let mut state = self.lock();
        Self::record(&mut state, statement)?;
        trace_log!("[MEMORY] {}", statement);

        if statement.kind() != StatementKind::Select {
            return Err(MemoryExecutorError::WrongEntryPoint {
                kind: statement.kind(),
                expected: "execute",
            }
            .into());
        }

        let Some(identity) = statement.identity() else {
            return Ok(None);
        };
        let key = identity_key(identity);
        let stored = state
            .tables
            .get(statement.table().name())
            .and_then(|t| t.rows.get(&key));

        // Columns never written read back as NULL, as they would from a real table
        Ok(stored.map(|stored| {
            statement
                .projection()
                .iter()
                .map(|column| {
                    let value = stored.get(column).cloned().unwrap_or(ColumnValue::Null);
                    ColumnBinding::new(column.as_str(), value)
                })
                .collect()
        }))
    }
}
