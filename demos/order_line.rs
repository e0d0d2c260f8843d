//! # Order Line Example
//!
//! The smallest end-to-end use of RowHaus:
//! - An order line bound to the default logging executor
//! - `create()` turning its fields into an INSERT
//! - Computing the payment amount from the same fields
//!
//! Run with `RUST_LOG=info` to see the executed statement.

use rowhaus::prelude::*;
use rowhaus::Orders;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("RowHaus Order Line Example");
    println!("==========================");

    let mut order = Orders::detached();
    order.set_item_id(10);
    order.set_item_price(100);
    order.set_quantity(2);

    println!("\nTable: {}", order.table());
    for binding in order.bindings()? {
        println!("  {} = {}", binding.column(), binding.value());
    }

    // The logging executor assigns no identity, so the order stays transient
    order.create()?;
    println!("\nState after create: {:?}", order.state());

    println!("Payment amount: {} cents", order.calculate_payment_amount()?);

    Ok(())
}
