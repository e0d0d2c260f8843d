//! Order line entity
//!
//! One line of an order: which item, at what unit price, how many. Prices are
//! integer minor currency units (cents), so payment amounts are exact.

use active_record::{Executor, Persistable, RecordCore, StoreError};
use std::sync::Arc;
use table_derive::Entity;

#[derive(Debug, Clone, Entity)]
pub struct Orders {
    id: Option<i64>,
    item_id: Option<i64>,
    item_price: Option<i64>,
    quantity: Option<u32>,
    record: RecordCore,
}

impl Orders {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self::bind(executor)
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn item_id(&self) -> Option<i64> {
        self.item_id
    }

    pub fn item_price(&self) -> Option<i64> {
        self.item_price
    }

    pub fn quantity(&self) -> Option<u32> {
        self.quantity
    }

    pub fn set_item_id(&mut self, item_id: i64) {
        self.item_id = Some(item_id);
    }

    /// Unit price in minor currency units
    pub fn set_item_price(&mut self, item_price: i64) {
        self.item_price = Some(item_price);
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = Some(quantity);
    }

    /// `item_price * quantity`, in minor currency units
    pub fn calculate_payment_amount(&self) -> Result<i64, StoreError> {
        let item_price = self.item_price.ok_or(StoreError::IncompleteState {
            entity: "Orders",
            field: "item_price",
        })?;
        let quantity = self.quantity.ok_or(StoreError::IncompleteState {
            entity: "Orders",
            field: "quantity",
        })?;

        item_price
            .checked_mul(i64::from(quantity))
            .ok_or(StoreError::Overflow {
                entity: "Orders",
                computation: "item_price * quantity",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use active_record::{Entity, EntityState, LogExecutor, MemoryExecutor};

    fn order() -> Orders {
        Orders::new(Arc::new(LogExecutor::new()))
    }

    #[test]
    fn test_payment_amount() {
        let mut order = order();
        order.set_item_id(10);
        order.set_item_price(100);
        order.set_quantity(2);
        assert_eq!(order.calculate_payment_amount().unwrap(), 200);
    }

    #[test]
    fn test_payment_amount_needs_every_input() {
        let mut order = order();
        order.set_item_price(100);
        let err = order.calculate_payment_amount().unwrap_err();
        assert!(matches!(
            err,
            StoreError::IncompleteState { entity: "Orders", field: "quantity" }
        ));

        let mut order = self::order();
        order.set_quantity(2);
        let err = order.calculate_payment_amount().unwrap_err();
        assert!(matches!(
            err,
            StoreError::IncompleteState { field: "item_price", .. }
        ));
    }

    #[test]
    fn test_payment_amount_overflow() {
        let mut order = order();
        order.set_item_price(i64::MAX);
        order.set_quantity(2);
        assert!(matches!(
            order.calculate_payment_amount().unwrap_err(),
            StoreError::Overflow { .. }
        ));
    }

    #[test]
    fn test_table_and_columns() {
        assert_eq!(Orders::table_name(), "orders");
        let columns: Vec<_> = Orders::fields().iter().map(|f| f.name).collect();
        assert_eq!(columns, vec!["item_id", "item_price", "quantity"]);
        assert_eq!(order().table().name(), "orders");
    }

    #[test]
    fn test_create_assigns_identity() {
        let executor = Arc::new(MemoryExecutor::new());
        let mut order = Orders::new(executor.clone());
        order.set_item_id(10);
        order.set_item_price(100);
        order.set_quantity(2);

        order.create().unwrap();
        assert_eq!(order.id(), Some(1));
        assert_eq!(order.state(), EntityState::Persisted);
    }
}
