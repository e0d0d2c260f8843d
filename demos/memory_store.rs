//! # In-Memory Store Example
//!
//! Walks an entity through its whole lifecycle against `MemoryExecutor`:
//! - Mapper settings parsed from TOML
//! - create, update, find, reload and delete
//! - The errors each invalid transition produces

use rowhaus::prelude::*;
use rowhaus::Orders;
use std::sync::Arc;

const CONFIG: &str = r#"
[mapper]
unset_policy = "omit"
placeholder_style = "question"
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_toml_str(CONFIG)?;
    let executor = Arc::new(MemoryExecutor::new());
    let rowhaus = RowHaus::with_mapper(executor.clone(), config.mapper);

    println!("📝 Create");
    let mut order: Orders = rowhaus.entity();
    order.set_item_id(7);
    order.set_item_price(1_250);
    order.set_quantity(3);
    order.create()?;
    let id = order.id().ok_or_else(|| anyhow::anyhow!("no identity generated"))?;
    println!("  created order {} ({:?})", id, order.state());

    println!("✏️  Update");
    order.set_quantity(4);
    order.update()?;

    println!("🔍 Find");
    let mut copy: Orders = rowhaus.find(&id)?;
    println!(
        "  order {} pays {} cents",
        id,
        copy.calculate_payment_amount()?
    );

    copy.set_item_price(1_000);
    copy.update()?;
    order.reload()?;
    println!("  reloaded price: {:?}", order.item_price());

    println!("🗑️  Delete");
    order.delete()?;
    if let Err(e) = order.update() {
        println!("  update after delete: {}", e);
    }
    if let Err(e) = copy.delete() {
        println!("  second delete: {}", e);
    }

    println!("\nStatements:");
    for statement in executor.statements() {
        let (sql, params) = rowhaus.render(&statement);
        println!("  {}  -- {} params", sql, params.len());
    }

    Ok(())
}
