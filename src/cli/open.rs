//! Open command: act on a location carrying `toggle=` / `delete=` parameters

use anyhow::{Context, Result};

use crate::command::{run_cycle, Request};
use crate::model::Catalog;
use crate::store::RowStore;

pub fn run(store: &dyn RowStore, catalog: &Catalog, location: &str) -> Result<()> {
    let cycle = run_cycle(store, catalog, &Request::link(location))
        .with_context(|| format!("Failed to process {:?} against {}", location, store.describe()))?;

    if let Some(consumed) = &cycle.location {
        println!("Location: {}", if consumed.is_empty() { "/" } else { consumed });
    }

    super::report(&cycle, None);
    if !cycle.outcome.needs_render() {
        println!();
        super::view::render(&cycle.view, None);
    }
    Ok(())
}
