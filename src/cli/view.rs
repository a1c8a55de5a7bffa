//! View command implementation

use anyhow::{Context, Result};

use crate::command::{run_cycle, Request};
use crate::model::Catalog;
use crate::store::RowStore;
use crate::view::{GroupedView, StoreSection};

pub fn run(
    store: &dyn RowStore,
    catalog: &Catalog,
    filter: Option<String>,
    json: bool,
) -> Result<()> {
    let cycle = run_cycle(store, catalog, &Request::none())
        .with_context(|| format!("Failed to load list from {}", store.describe()))?;

    if let Some(name) = filter.as_deref() {
        if cycle.view.store(name).is_none() {
            println!("Unknown store '{}'. Known stores: {}", name, catalog.stores.join(", "));
            return Ok(());
        }
    }

    if json {
        let sections: Vec<&StoreSection> = cycle
            .view
            .stores
            .iter()
            .filter(|s| filter.as_deref().map_or(true, |f| s.store == f))
            .collect();
        println!("{}", serde_json::to_string_pretty(&sections)?);
    } else {
        render(&cycle.view, filter.as_deref());
    }
    Ok(())
}

/// Text rendering: one block per store, categories indented beneath
pub fn render(view: &GroupedView, filter: Option<&str>) {
    let counts = view.counts();
    println!(
        "🛒 Shopping List ({} items, {} purchased)",
        counts.items, counts.purchased
    );

    for section in &view.stores {
        if filter.map_or(false, |f| section.store != f) {
            continue;
        }

        println!("\n{}", section.store);
        println!("{}", "-".repeat(40));

        if section.is_empty() {
            println!("  The list for {} is empty.", section.store);
            continue;
        }

        for group in &section.categories {
            println!("  {}", group.category);
            for row in &group.items {
                let status = if row.purchased { "✅" } else { "🛒" };
                println!("    {:>4}  {} {}", row.id, status, row.item);
            }
        }
    }
}
