//! In-memory list operations
//!
//! Every operation takes the current table by reference and returns the next
//! one; nothing here touches storage.

use chrono::{DateTime, Utc};

use crate::error::{ListError, Result};
use crate::model::{Item, ItemId, Table, DEFAULT_CATEGORY, DEFAULT_STORE};

pub const MSG_EMPTY_NAME: &str = "Please enter a valid item name.";
pub const MSG_DUPLICATE: &str = "That item is already on the list.";

/// Append a new, unpurchased item stamped with the current time
pub fn add(table: &Table, item: &str, category: &str, store: &str) -> Result<Table> {
    add_at(table, item, category, store, Utc::now())
}

pub fn add_at(
    table: &Table,
    item: &str,
    category: &str,
    store: &str,
    now: DateTime<Utc>,
) -> Result<Table> {
    let name = item.trim();
    if name.is_empty() {
        return Err(ListError::validation(MSG_EMPTY_NAME));
    }
    if table.contains_name(name) {
        return Err(ListError::validation(MSG_DUPLICATE));
    }

    let mut next = table.clone();
    let id = next.next_id();
    next.rows_mut().push(Item {
        id,
        timestamp: Some(now),
        item: name.to_string(),
        purchased: false,
        category: label_or(category, DEFAULT_CATEGORY),
        store: label_or(store, DEFAULT_STORE),
    });
    Ok(next)
}

/// Same cleanup a stored cell gets when it is loaded back
fn label_or(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Flip the purchased flag of one row
pub fn toggle(table: &Table, id: ItemId) -> Result<Table> {
    let pos = table.position(id).ok_or(ListError::NotFound(id))?;
    let mut next = table.clone();
    let row = &mut next.rows_mut()[pos];
    row.purchased = !row.purchased;
    Ok(next)
}

/// Remove one row; the remaining rows keep their ids
pub fn delete(table: &Table, id: ItemId) -> Result<Table> {
    let pos = table.position(id).ok_or(ListError::NotFound(id))?;
    let mut next = table.clone();
    next.rows_mut().remove(pos);
    Ok(next)
}

pub fn clear_purchased(table: &Table) -> Table {
    Table::from_rows(
        table
            .rows()
            .iter()
            .filter(|row| !row.purchased)
            .cloned()
            .collect(),
    )
}

pub fn clear_all(_table: &Table) -> Table {
    Table::new()
}
