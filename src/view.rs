//! Display projection of the list
//!
//! Sections follow the catalog's store order. Within a store, categories are
//! sorted by name and each category lists unpurchased rows before purchased
//! ones, otherwise keeping table order. Every row carries its stable id, so
//! links built from the view act on the row they are shown next to.

use serde::Serialize;

use crate::model::{Catalog, Item, ItemId, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    pub id: ItemId,
    pub item: String,
    pub purchased: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<ViewRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSection {
    pub store: String,
    pub categories: Vec<CategoryGroup>,
}

impl StoreSection {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedView {
    pub stores: Vec<StoreSection>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub items: usize,
    pub purchased: usize,
}

impl GroupedView {
    pub fn store(&self, name: &str) -> Option<&StoreSection> {
        self.stores.iter().find(|s| s.store == name)
    }

    pub fn counts(&self) -> Counts {
        self.stores
            .iter()
            .flat_map(|s| &s.categories)
            .flat_map(|c| &c.items)
            .fold(Counts::default(), |mut acc, row| {
                acc.items += 1;
                if row.purchased {
                    acc.purchased += 1;
                }
                acc
            })
    }
}

/// Build the grouped view; the table is only read
pub fn project(table: &Table, catalog: &Catalog) -> GroupedView {
    let mut stores: Vec<&str> = catalog.stores.iter().map(String::as_str).collect();

    // Rows filed under a store the catalog no longer lists still get a section
    for row in table.rows() {
        if !stores.contains(&row.store.as_str()) {
            stores.push(&row.store);
        }
    }

    GroupedView {
        stores: stores
            .into_iter()
            .map(|store| project_store(table, store))
            .collect(),
    }
}

fn project_store(table: &Table, store: &str) -> StoreSection {
    let mut rows: Vec<&Item> = table.rows().iter().filter(|r| r.store == store).collect();
    // Stable: equal keys keep table order
    rows.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then(a.purchased.cmp(&b.purchased))
    });

    let mut categories: Vec<CategoryGroup> = Vec::new();
    for row in rows {
        let view_row = ViewRow {
            id: row.id,
            item: row.item.clone(),
            purchased: row.purchased,
        };
        match categories.last_mut() {
            Some(group) if group.category == row.category => group.items.push(view_row),
            _ => categories.push(CategoryGroup {
                category: row.category.clone(),
                items: vec![view_row],
            }),
        }
    }

    StoreSection {
        store: store.to_string(),
        categories,
    }
}
