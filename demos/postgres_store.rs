//! # PostgreSQL Example
//!
//! Runs the order line against a real database. Requires the `postgres`
//! feature and a config file with a `[database]` section, named by
//! `ROWHAUS_CONFIG` or placed at `./rowhaus.toml`:
//!
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "rowhaus"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 5
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//! ```
//!
//! The table must exist:
//!
//! ```sql
//! CREATE TABLE orders (
//!     id BIGSERIAL PRIMARY KEY,
//!     item_id BIGINT,
//!     item_price BIGINT,
//!     quantity BIGINT
//! );
//! ```

use rowhaus::prelude::*;
use rowhaus::Orders;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let rowhaus = RowHaus::from_env()?;

    let mut order: Orders = rowhaus.entity();
    order.set_item_id(10);
    order.set_item_price(100);
    order.set_quantity(2);
    order.create()?;
    println!("Created order {:?}", order.id());

    order.set_quantity(5);
    order.update()?;

    if let Some(id) = order.id() {
        let stored: Orders = rowhaus.find(&id)?;
        println!("Stored order pays {} cents", stored.calculate_payment_amount()?);
    }

    order.delete()?;
    println!("Deleted, state is {:?}", order.state());

    Ok(())
}
