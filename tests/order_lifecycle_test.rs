//! Integration tests for the entity lifecycle
//!
//! Runs the order-line entity through create, update, delete and lookup
//! against the in-memory executor.

use rowhaus::prelude::*;
use rowhaus::Orders;
use std::sync::Arc;

fn order_line(executor: &Arc<MemoryExecutor>) -> Orders {
    let mut order = Orders::new(executor.clone());
    order.set_item_id(10);
    order.set_item_price(100);
    order.set_quantity(2);
    order
}

#[test]
fn test_table_name_is_stable() {
    let first = Orders::new(default_executor());
    let second = Orders::new(default_executor());
    assert_eq!(first.table().name(), "orders");
    assert_eq!(first.table(), second.table());
    assert_eq!(Orders::table_name(), first.table().name());
}

#[test]
fn test_create_binds_every_declared_field_in_order() {
    let executor = Arc::new(MemoryExecutor::new());
    let mut order = order_line(&executor);

    let columns: Vec<_> = order
        .bindings()
        .unwrap()
        .iter()
        .map(|b| b.column().to_string())
        .collect();
    assert_eq!(columns, vec!["item_id", "item_price", "quantity"]);

    order.create().unwrap();
    let insert = &executor.statements()[0];
    assert_eq!(
        insert.to_string(),
        "INSERT INTO orders (item_id, item_price, quantity) VALUES (10, 100, 2);"
    );
    assert_eq!(
        insert.to_sql(PlaceholderStyle::Dollar).0,
        "INSERT INTO orders (item_id, item_price, quantity) VALUES ($1, $2, $3);"
    );
}

#[test]
fn test_unset_fields_are_left_out_of_the_insert() {
    let executor = Arc::new(MemoryExecutor::new());
    let mut order = Orders::new(executor.clone());
    order.set_quantity(4);
    order.create().unwrap();

    assert_eq!(
        executor.statements()[0].to_string(),
        "INSERT INTO orders (quantity) VALUES (4);"
    );
}

#[test]
fn test_empty_order_has_nothing_to_insert() {
    let executor = Arc::new(MemoryExecutor::new());
    let mut order = Orders::new(executor.clone());

    let err = order.create().unwrap_err();
    assert!(matches!(err, StoreError::EmptyBindings { .. }));
    assert!(executor.statements().is_empty());
}

#[test]
fn test_full_lifecycle() {
    let executor = Arc::new(MemoryExecutor::new());
    let mut order = order_line(&executor);

    assert!(matches!(
        order.update().unwrap_err(),
        StoreError::MissingIdentity { .. }
    ));
    assert!(matches!(
        order.delete().unwrap_err(),
        StoreError::MissingIdentity { .. }
    ));

    order.create().unwrap();
    let id = order.id().unwrap();
    assert_eq!(order.state(), EntityState::Persisted);

    order.set_quantity(3);
    order.update().unwrap();
    let stored = Orders::find_by_id(executor.clone(), &id).unwrap();
    assert_eq!(stored.quantity(), Some(3));
    assert_eq!(stored.calculate_payment_amount().unwrap(), 300);

    order.delete().unwrap();
    assert_eq!(order.state(), EntityState::Deleted);
    assert!(matches!(
        order.update().unwrap_err(),
        StoreError::StaleEntity { .. }
    ));

    let kinds: Vec<_> = executor.statements().iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            StatementKind::Insert,
            StatementKind::Update,
            StatementKind::Select,
            StatementKind::Delete,
        ]
    );
}

#[test]
fn test_update_statement_references_identity() {
    let executor = Arc::new(MemoryExecutor::new());
    let mut order = order_line(&executor);
    order.create().unwrap();
    order.set_item_price(150);
    order.update().unwrap();

    assert_eq!(
        executor.statements()[1].to_string(),
        "UPDATE orders SET item_id = 10, item_price = 150, quantity = 2 WHERE id = 1;"
    );
}

#[test]
fn test_find_by_id_missing_row() {
    let executor = Arc::new(MemoryExecutor::new());
    let err = Orders::find_by_id(executor, &404).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "No row in table 'orders' with identity 404");
}

#[test]
fn test_failed_create_keeps_entity_transient() {
    let executor = Arc::new(MemoryExecutor::new());
    let mut order = order_line(&executor);
    executor.fail_next("disk full");

    let err = order.create().unwrap_err();
    assert!(err.to_string().ends_with("failed: disk full"));
    assert_eq!(order.id(), None);
    assert_eq!(order.state(), EntityState::Transient);

    order.create().unwrap();
    assert_eq!(order.id(), Some(1));
}

#[test]
fn test_payment_amount_without_quantity() {
    let executor = Arc::new(MemoryExecutor::new());
    let mut order = Orders::new(executor);
    order.set_item_price(100);

    let err = order.calculate_payment_amount().unwrap_err();
    assert_eq!(err.to_string(), "Orders.quantity must be set before it can be used");
}

#[test]
fn test_entities_share_executor_across_threads() {
    let executor = Arc::new(MemoryExecutor::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let executor = executor.clone();
            std::thread::spawn(move || {
                let mut order = Orders::new(executor);
                order.set_item_id(i);
                order.set_quantity(1);
                order.create().map(|_| order.id())
            })
        })
        .collect();

    let mut ids: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(executor.row_count("orders"), 4);
}
