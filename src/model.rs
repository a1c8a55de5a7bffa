//! Shopping list data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Category assigned to legacy rows that predate the category column
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Store assigned to legacy rows that predate the store column
pub const DEFAULT_STORE: &str = "Other";

/// Canonical on-disk column order
pub const COLUMNS: [&str; 6] = ["id", "timestamp", "item", "purchased", "category", "store"];

/// Stable row key, assigned once when the row is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Rejected id text, e.g. a tampered `?toggle=` link
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item id: {0:?}")]
pub struct InvalidItemId(pub String);

impl std::str::FromStr for ItemId {
    type Err = InvalidItemId;

    /// Only plain ASCII digits are accepted (no sign, no whitespace)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidItemId(s.to_string()));
        }
        s.parse::<u64>()
            .map(ItemId)
            .map_err(|_| InvalidItemId(s.to_string()))
    }
}

/// One shopping list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub timestamp: Option<DateTime<Utc>>,
    pub item: String,
    pub purchased: bool,
    pub category: String,
    pub store: String,
}

/// Ordered list of items, as persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Item>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Item>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Item] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Exact, case-sensitive name lookup
    pub fn contains_name(&self, name: &str) -> bool {
        self.rows.iter().any(|row| row.item == name)
    }

    /// Next unused id: one past the current maximum
    pub fn next_id(&self) -> ItemId {
        IdAllocator::new(self.rows.iter().map(|row| row.id)).allocate()
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Item> {
        &mut self.rows
    }
}

/// Hands out ids not yet in use
///
/// Ids grow past the largest one seen. Once `u64::MAX` is taken, the
/// lowest free id is used instead.
pub(crate) struct IdAllocator {
    used: BTreeSet<u64>,
}

impl IdAllocator {
    pub fn new(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            used: ids.into_iter().map(|id| id.0).collect(),
        }
    }

    pub fn allocate(&mut self) -> ItemId {
        let id = match self.used.last() {
            None => 0,
            Some(max) => match max.checked_add(1) {
                Some(id) => id,
                None => self.lowest_free(),
            },
        };
        self.used.insert(id);
        ItemId(id)
    }

    fn lowest_free(&self) -> u64 {
        let mut candidate = 0;
        for &id in &self.used {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }
}

/// Closed sets of categories and stores offered when adding an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    #[serde(default = "default_stores")]
    pub stores: Vec<String>,
}

pub fn default_categories() -> Vec<String> {
    ["Vegetables", "Beverages", "Meat/Dairy", "Frozen", "Dry Goods"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_stores() -> Vec<String> {
    ["Costco", "Trader Joe's", "Whole Foods", "Other"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            stores: default_stores(),
        }
    }
}

impl Catalog {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn has_store(&self, store: &str) -> bool {
        self.stores.iter().any(|s| s == store)
    }
}

#[cfg(test)]
pub(crate) fn item(id: u64, name: &str, purchased: bool, category: &str, store: &str) -> Item {
    Item {
        id: ItemId(id),
        timestamp: None,
        item: name.to_string(),
        purchased,
        category: category.to_string(),
        store: store.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_parsing() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId(42));
        assert_eq!("0".parse::<ItemId>().unwrap(), ItemId(0));
        assert!("".parse::<ItemId>().is_err());
        assert!("-1".parse::<ItemId>().is_err());
        assert!("+1".parse::<ItemId>().is_err());
        assert!(" 1".parse::<ItemId>().is_err());
        assert!("1a".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_next_id_is_one_past_max() {
        assert_eq!(Table::new().next_id(), ItemId(0));

        let table = Table::from_rows(vec![
            item(4, "Milk", false, "Meat/Dairy", "Costco"),
            item(1, "Eggs", false, "Meat/Dairy", "Costco"),
        ]);
        assert_eq!(table.next_id(), ItemId(5));
    }

    #[test]
    fn test_next_id_after_max_value_reuses_lowest_free() {
        let table = Table::from_rows(vec![
            item(0, "Milk", false, "Meat/Dairy", "Costco"),
            item(u64::MAX, "Eggs", false, "Meat/Dairy", "Costco"),
            item(2, "Kale", false, "Vegetables", "Costco"),
        ]);
        assert_eq!(table.next_id(), ItemId(1));

        let mut ids = IdAllocator::new(table.rows().iter().map(|row| row.id));
        assert_eq!(ids.allocate(), ItemId(1));
        assert_eq!(ids.allocate(), ItemId(3));
        assert_eq!(ids.allocate(), ItemId(4));
    }

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.has_category("Frozen"));
        assert!(catalog.has_store("Trader Joe's"));
        assert!(!catalog.has_store("trader joe's"));
        assert!(!catalog.has_category(DEFAULT_CATEGORY));
    }
}
