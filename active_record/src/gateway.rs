//! Table gateway
//!
//! Binds one table to an executor. Every call builds exactly one statement
//! and submits it exactly once.

use crate::binding::{ColumnBinding, Row};
use crate::debug_log;
use crate::descriptor::TableDescriptor;
use crate::errors::StoreError;
use crate::executor::{ExecutionOutcome, Executor};
use crate::statement::{Statement, StatementBuilder};
use crate::traits::Entity;
use std::sync::Arc;
use type_mapping::ColumnValue;

/// Statement front door for a single table
#[derive(Clone)]
pub struct TableGateway {
    table: TableDescriptor,
    builder: StatementBuilder,
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for TableGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableGateway")
            .field("table", &self.table.name())
            .field("identity_column", &self.table.identity_column())
            .field("unset_policy", &self.builder.unset_policy())
            .finish()
    }
}

impl TableGateway {
    pub fn new(table: TableDescriptor, executor: Arc<dyn Executor>) -> Self {
        Self::with_builder(table, executor, StatementBuilder::default())
    }

    pub fn with_builder(
        table: TableDescriptor,
        executor: Arc<dyn Executor>,
        builder: StatementBuilder,
    ) -> Self {
        Self {
            table,
            builder,
            executor,
        }
    }

    /// Gateway for the table an entity type maps to
    pub fn for_entity<E: Entity>(executor: Arc<dyn Executor>, builder: StatementBuilder) -> Self {
        Self::with_builder(TableDescriptor::for_entity::<E>(), executor, builder)
    }

    pub fn table(&self) -> &TableDescriptor {
        &self.table
    }

    pub fn builder(&self) -> &StatementBuilder {
        &self.builder
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    pub fn insert(&self, bindings: Vec<ColumnBinding>) -> Result<ExecutionOutcome, StoreError> {
        let statement = self.builder.build_insert(&self.table, bindings)?;
        self.submit(statement)
    }

    pub fn update(
        &self,
        identity: Option<ColumnValue>,
        bindings: Vec<ColumnBinding>,
    ) -> Result<ExecutionOutcome, StoreError> {
        let statement = self.builder.build_update(&self.table, identity, bindings)?;
        self.submit(statement)
    }

    pub fn delete(&self, identity: Option<ColumnValue>) -> Result<ExecutionOutcome, StoreError> {
        let statement = self.builder.build_delete(&self.table, identity)?;
        self.submit(statement)
    }

    /// Fetch the identity column plus `columns` of the row keyed by `identity`
    pub fn find(
        &self,
        identity: Option<ColumnValue>,
        columns: &[&str],
    ) -> Result<Option<Row>, StoreError> {
        let statement = self.builder.build_select(&self.table, identity, columns)?;
        debug_log!("[FIND] {}", statement);
        self.executor
            .fetch_one(&statement)
            .map_err(|source| StoreError::execution(statement, source))
    }

    fn submit(&self, statement: Statement) -> Result<ExecutionOutcome, StoreError> {
        debug_log!("[{}] {}", statement.kind(), statement);
        self.executor
            .execute(&statement)
            .map_err(|source| StoreError::execution(statement, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::MemoryExecutor;
    use crate::statement::StatementKind;

    fn gateway() -> (Arc<MemoryExecutor>, TableGateway) {
        let executor = Arc::new(MemoryExecutor::new());
        let gateway = TableGateway::new(
            TableDescriptor::new("orders").unwrap(),
            executor.clone(),
        );
        (executor, gateway)
    }

    #[test]
    fn test_each_call_submits_one_statement() {
        let (executor, gateway) = gateway();
        let outcome = gateway
            .insert(vec![ColumnBinding::new("quantity", 2)])
            .unwrap();
        let id = outcome.generated_identity.unwrap();
        gateway
            .update(Some(id.clone()), vec![ColumnBinding::new("quantity", 3)])
            .unwrap();
        gateway.delete(Some(id)).unwrap();

        let kinds: Vec<_> = executor.statements().iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StatementKind::Insert,
                StatementKind::Update,
                StatementKind::Delete
            ]
        );
    }

    #[test]
    fn test_builder_errors_never_reach_the_executor() {
        let (executor, gateway) = gateway();
        assert!(matches!(
            gateway.insert(Vec::new()),
            Err(StoreError::EmptyBindings { .. })
        ));
        assert!(matches!(
            gateway.delete(None),
            Err(StoreError::MissingIdentity { .. })
        ));
        assert!(executor.statements().is_empty());
    }

    #[test]
    fn test_execution_error_carries_statement() {
        let (executor, gateway) = gateway();
        executor.fail_next("disk full");

        let err = gateway
            .insert(vec![ColumnBinding::new("quantity", 2)])
            .unwrap_err();
        let statement = err.statement().expect("statement attached");
        assert_eq!(statement.kind(), StatementKind::Insert);
        assert_eq!(
            err.to_string(),
            "Executing `INSERT INTO orders (quantity) VALUES (2);` failed: disk full"
        );
    }

    #[test]
    fn test_gateway_is_shareable_across_threads() {
        let (executor, gateway) = gateway();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gateway = gateway.clone();
                std::thread::spawn(move || {
                    gateway
                        .insert(vec![ColumnBinding::new("quantity", 1)])
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(executor.row_count("orders"), 4);
    }
}
