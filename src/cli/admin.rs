use anyhow::{Context, Result};

use crate::admin::AdminGate;
use crate::command::{run_cycle, Command, Request};
use crate::model::Catalog;
use crate::store::RowStore;

fn run(
    store: &dyn RowStore,
    catalog: &Catalog,
    gate: &AdminGate,
    name: &str,
    command: Command,
) -> Result<()> {
    if let Err(e) = gate.check(name) {
        println!("⚠️  {}", e);
        return Ok(());
    }

    let cycle = run_cycle(store, catalog, &Request::submit(command))
        .with_context(|| format!("Failed to clear list in {}", store.describe()))?;
    super::report(&cycle, None);
    Ok(())
}

pub fn clear_purchased(
    store: &dyn RowStore,
    catalog: &Catalog,
    gate: &AdminGate,
    name: &str,
) -> Result<()> {
    run(store, catalog, gate, name, Command::ClearPurchased)
}

pub fn clear_all(
    store: &dyn RowStore,
    catalog: &Catalog,
    gate: &AdminGate,
    name: &str,
) -> Result<()> {
    run(store, catalog, gate, name, Command::ClearAll)
}
