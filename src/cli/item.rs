//! Add, toggle and delete commands

use anyhow::{Context, Result};

use crate::command::{run_cycle, Command, Request};
use crate::model::{Catalog, ItemId};
use crate::store::RowStore;

fn submit(store: &dyn RowStore, catalog: &Catalog, command: Command) -> Result<()> {
    let cycle = run_cycle(store, catalog, &Request::submit(command))
        .with_context(|| format!("Failed to update list in {}", store.describe()))?;
    super::report(&cycle, None);
    Ok(())
}

pub fn add(
    store: &dyn RowStore,
    catalog: &Catalog,
    item: String,
    store_name: Option<String>,
    category: Option<String>,
) -> Result<()> {
    submit(
        store,
        catalog,
        Command::Add {
            item,
            category,
            store: store_name,
        },
    )
}

pub fn toggle(store: &dyn RowStore, catalog: &Catalog, id: ItemId) -> Result<()> {
    submit(store, catalog, Command::Toggle { id })
}

pub fn delete(store: &dyn RowStore, catalog: &Catalog, id: ItemId) -> Result<()> {
    submit(store, catalog, Command::Delete { id })
}
