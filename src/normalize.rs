//! Schema normalization for loaded tables
//!
//! Older list files predate some columns (`category`, `store`, `id`) and store
//! `purchased` in whatever form the writer chose. Everything a backend loads
//! goes through [`normalize`] before the rest of the crate sees it.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashSet;

use crate::model::{IdAllocator, Item, ItemId, Table, DEFAULT_CATEGORY, DEFAULT_STORE};

/// Rows as read from a backend: a header plus untyped cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }
}

/// Column positions resolved once per table
struct Columns {
    id: Option<usize>,
    timestamp: Option<usize>,
    item: Option<usize>,
    purchased: Option<usize>,
    category: Option<usize>,
    store: Option<usize>,
}

fn cell(row: &[Option<String>], col: Option<usize>) -> Option<&str> {
    col.and_then(|i| row.get(i))
        .and_then(|v| v.as_deref())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Produce a table with every canonical column populated
pub fn normalize(raw: RawTable) -> Table {
    let cols = Columns {
        id: raw.column("id"),
        timestamp: raw.column("timestamp"),
        item: raw.column("item"),
        purchased: raw.column("purchased"),
        category: raw.column("category"),
        store: raw.column("store"),
    };

    let mut seen = HashSet::new();
    let mut pending = Vec::with_capacity(raw.rows.len());

    for row in &raw.rows {
        let id = cell(row, cols.id)
            .and_then(|v| v.parse::<ItemId>().ok())
            .filter(|id| seen.insert(*id));

        let item = Item {
            id: id.unwrap_or(ItemId(0)),
            timestamp: cell(row, cols.timestamp).and_then(parse_timestamp),
            // Names are kept verbatim; only empty cells collapse
            item: cols
                .item
                .and_then(|i| row.get(i))
                .and_then(|v| v.clone())
                .unwrap_or_default(),
            purchased: cell(row, cols.purchased)
                .map(parse_purchased)
                .unwrap_or(false),
            category: cell(row, cols.category)
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
            store: cell(row, cols.store).unwrap_or(DEFAULT_STORE).to_string(),
        };
        pending.push((id.is_some(), item));
    }

    // Rows without a usable id get fresh ones past the current maximum
    let mut ids = IdAllocator::new(seen);
    let mut backfilled = 0usize;
    let rows = pending
        .into_iter()
        .map(|(has_id, mut item)| {
            if !has_id {
                item.id = ids.allocate();
                backfilled += 1;
            }
            item
        })
        .collect::<Vec<_>>();

    if backfilled > 0 {
        tracing::debug!("Assigned ids to {} rows without a usable id", backfilled);
    }

    Table::from_rows(rows)
}

/// Coerce the many spellings of a boolean found in list files
pub fn parse_purchased(value: &str) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "1.0" => true,
        "false" | "f" | "no" | "n" | "0" | "0.0" | "" => false,
        other => {
            tracing::warn!("Unrecognized purchased value {:?}, treating as false", other);
            false
        }
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// RFC 3339, or the naive local format older files were written with (read as UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }

    tracing::warn!("Unparseable timestamp {:?}, dropping it", value);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn raw(header: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|c| {
                            if c.is_empty() {
                                None
                            } else {
                                Some(c.to_string())
                            }
                        })
                        .collect()
                })
                .collect(),
        }
    }

    #[test]
    fn test_item_only_table_gets_defaults() {
        let table = normalize(raw(&["item"], &[&["Milk"], &["Eggs"], &["Bread"]]));

        assert_eq!(table.len(), 3);
        for row in table.rows() {
            assert_eq!(row.category, "Uncategorized");
            assert_eq!(row.store, "Other");
            assert!(!row.purchased);
            assert!(row.timestamp.is_none());
        }
        let ids: Vec<u64> = table.rows().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_purchased_coercion() {
        let table = normalize(raw(
            &["item", "purchased"],
            &[
                &["a", "True"],
                &["b", "False"],
                &["c", "1"],
                &["d", "0"],
                &["e", ""],
                &["f", "yes"],
                &["g", "bogus"],
                &["h", "1.0"],
            ],
        ));
        let flags: Vec<bool> = table.rows().iter().map(|r| r.purchased).collect();
        assert_eq!(
            flags,
            vec![true, false, true, false, false, true, false, true]
        );
    }

    #[test]
    fn test_empty_cells_in_present_columns_use_defaults() {
        let table = normalize(raw(
            &["item", "category", "store"],
            &[&["Milk", "", ""], &["Kale", "Vegetables", "Costco"]],
        ));
        assert_eq!(table.rows()[0].category, "Uncategorized");
        assert_eq!(table.rows()[0].store, "Other");
        assert_eq!(table.rows()[1].category, "Vegetables");
        assert_eq!(table.rows()[1].store, "Costco");
    }

    #[test]
    fn test_missing_and_duplicate_ids_are_backfilled() {
        let table = normalize(raw(
            &["id", "item"],
            &[&["7", "a"], &["", "b"], &["7", "c"], &["x", "d"], &["2", "e"]],
        ));
        let ids: Vec<u64> = table.rows().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![7, 8, 9, 10, 2]);
    }

    #[test]
    fn test_backfill_after_max_id_stays_unique() {
        let table = normalize(raw(
            &["id", "item"],
            &[&["18446744073709551615", "Milk"], &["", "Eggs"]],
        ));
        let ids: Vec<u64> = table.rows().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![u64::MAX, 0]);

        let table = crate::mutate::add(&table, "Kale", "Vegetables", "Costco").unwrap();
        let ids: HashSet<ItemId> = table.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_extra_columns_and_padded_headers() {
        let table = normalize(raw(
            &[" item ", "notes", "store"],
            &[&["Milk", "2%", "Costco"]],
        ));
        assert_eq!(table.rows()[0].item, "Milk");
        assert_eq!(table.rows()[0].store, "Costco");
    }

    #[test]
    fn test_short_rows_do_not_panic() {
        let table = normalize(raw(&["item", "purchased", "store"], &[&["Milk"]]));
        assert_eq!(table.rows()[0].store, "Other");
        assert!(!table.rows()[0].purchased);
    }

    #[test]
    fn test_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-01T10:20:30.5+00:00").unwrap();
        assert_eq!(rfc.hour(), 10);

        let legacy = parse_timestamp("2024-03-01 10:20:30.123456").unwrap();
        assert_eq!(legacy.day(), 1);
        assert_eq!(legacy.second(), 30);

        assert!(parse_timestamp("yesterday").is_none());
    }
}
