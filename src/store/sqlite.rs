//! SQLite worksheet backend
//!
//! Several lists can share one database file, each in its own worksheet.
//! The connection is opened per call and never held across invocations.

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::StoreError;
use crate::model::{Table, COLUMNS};
use crate::normalize::RawTable;

use super::schema::{add_column, create_worksheet, insert_row, quote_ident, validate_worksheet};
use super::{encode_row, header, RowStore};

pub struct SqliteStore {
    path: PathBuf,
    worksheet: String,
    busy_timeout: Duration,
}

impl SqliteStore {
    pub fn new(
        path: impl Into<PathBuf>,
        worksheet: &str,
        busy_timeout: Duration,
    ) -> Result<Self, StoreError> {
        validate_worksheet(worksheet)?;
        Ok(Self {
            path: path.into(),
            worksheet: worksheet.to_string(),
            busy_timeout,
        })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.execute_batch(&create_worksheet(&self.worksheet))?;
        Ok(conn)
    }

    /// Columns the worksheet actually has, in table order
    fn columns(conn: &Connection, worksheet: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(worksheet)))?;
        let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
        names.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn cell_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
    }
}

impl RowStore for SqliteStore {
    fn describe(&self) -> String {
        format!("sqlite:{}#{}", self.path.display(), self.worksheet)
    }

    fn load_raw(&self) -> Result<RawTable, StoreError> {
        let conn = self.connect()?;
        let columns = Self::columns(&conn, &self.worksheet)?;
        if columns.is_empty() {
            return Ok(RawTable::new(header()));
        }

        let select = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            columns
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(", "),
            quote_ident(&self.worksheet)
        );
        let mut stmt = conn.prepare(&select)?;
        let width = columns.len();
        let rows = stmt.query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(cell_text))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut raw = RawTable::new(columns);
        raw.rows = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(raw)
    }

    fn save(&self, table: &Table) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        // Older worksheets may predate some columns
        let existing = Self::columns(&tx, &self.worksheet)?;
        for column in COLUMNS {
            if !existing.iter().any(|c| c == column) {
                tracing::info!("Adding column {} to worksheet {}", column, self.worksheet);
                tx.execute_batch(&add_column(&self.worksheet, column))?;
            }
        }

        tx.execute(&format!("DELETE FROM {}", quote_ident(&self.worksheet)), [])?;
        {
            let mut stmt = tx.prepare(&insert_row(&self.worksheet))?;
            for row in table.rows() {
                stmt.execute(params_from_iter(encode_row(row)))?;
            }
        }
        tx.commit()?;

        tracing::debug!("Saved {} items to {}", table.len(), self.describe());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemId;
    use crate::store::testing::sample_table;
    use tempfile::TempDir;

    fn store(dir: &TempDir, worksheet: &str) -> SqliteStore {
        SqliteStore::new(
            dir.path().join("lists.db"),
            worksheet,
            Duration::from_millis(500),
        )
        .unwrap()
    }

    #[test]
    fn test_new_worksheet_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir, "shopping_list").load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, "shopping_list");
        let table = sample_table();

        store.save(&table).unwrap();
        assert_eq!(store.load().unwrap(), table);

        // Saving again overwrites rather than appends
        store.save(&table).unwrap();
        assert_eq!(store.load().unwrap().len(), table.len());
    }

    #[test]
    fn test_worksheets_are_independent() {
        let dir = TempDir::new().unwrap();
        let home = store(&dir, "home");
        let office = store(&dir, "office");

        home.save(&sample_table()).unwrap();
        assert!(office.load().unwrap().is_empty());
        assert_eq!(home.load().unwrap().len(), 4);
    }

    #[test]
    fn test_legacy_worksheet_is_normalized_and_upgraded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lists.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE legacy (item TEXT, purchased INTEGER);
                 INSERT INTO legacy VALUES ('Milk', 1);
                 INSERT INTO legacy VALUES ('Eggs', 0);",
            )
            .unwrap();
        }

        let store = SqliteStore::new(&path, "legacy", Duration::from_millis(500)).unwrap();
        let table = store.load().unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.rows()[0].purchased);
        assert!(!table.rows()[1].purchased);
        assert_eq!(table.rows()[0].category, "Uncategorized");
        assert_eq!(table.rows()[1].store, "Other");

        store.save(&table).unwrap();
        let conn = Connection::open(&path).unwrap();
        let columns = SqliteStore::columns(&conn, "legacy").unwrap();
        for column in COLUMNS {
            assert!(columns.iter().any(|c| c == column), "missing {}", column);
        }
        assert_eq!(store.load().unwrap().get(ItemId(1)).unwrap().item, "Eggs");
    }

    #[test]
    fn test_invalid_worksheet_rejected() {
        let dir = TempDir::new().unwrap();
        let result = SqliteStore::new(dir.path().join("x.db"), "", Duration::from_millis(10));
        assert!(matches!(result, Err(StoreError::InvalidWorksheet(_))));
    }
}
