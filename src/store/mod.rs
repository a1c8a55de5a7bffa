//! Row storage backends
//!
//! A backend holds the whole list and is only ever read or written whole:
//! - `CsvFileStore`: a local CSV file
//! - `SqliteStore`: a named worksheet inside a SQLite database
//!
//! There is no locking or versioning between handles. When two invocations
//! load, mutate and save concurrently, the later save wins and the earlier
//! one's changes are lost.

mod csv_file;
mod schema;
mod sqlite;

pub use csv_file::CsvFileStore;
pub use sqlite::SqliteStore;

use chrono::SecondsFormat;

use crate::config::{Config, StorageBackend};
use crate::error::StoreError;
use crate::model::{Item, Table, COLUMNS};
use crate::normalize::{normalize, RawTable};

/// Load/save contract shared by all backends
pub trait RowStore {
    /// Human-readable location, for logs and messages
    fn describe(&self) -> String;

    /// Read the raw rows; a missing or empty resource is an empty table
    fn load_raw(&self) -> Result<RawTable, StoreError>;

    /// Overwrite the resource with the full table, header first
    fn save(&self, table: &Table) -> Result<(), StoreError>;

    /// Read and normalize
    fn load(&self) -> Result<Table, StoreError> {
        let raw = self.load_raw()?;
        let table = normalize(raw);
        tracing::debug!("Loaded {} items from {}", table.len(), self.describe());
        Ok(table)
    }
}

/// Open the backend named in the configuration
pub fn open(config: &Config) -> anyhow::Result<Box<dyn RowStore>> {
    let path = config.storage_path();
    let store: Box<dyn RowStore> = match config.storage.backend {
        StorageBackend::Csv => Box::new(CsvFileStore::new(path)),
        StorageBackend::Sqlite => Box::new(SqliteStore::new(
            path,
            &config.storage.worksheet,
            config.busy_timeout(),
        )?),
    };
    tracing::debug!("Using storage {}", store.describe());
    Ok(store)
}

// ============================================
// ROW ENCODING
// ============================================

pub(crate) fn header() -> Vec<String> {
    COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Cells in `COLUMNS` order
pub(crate) fn encode_row(item: &Item) -> [String; 6] {
    [
        item.id.to_string(),
        item.timestamp
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            .unwrap_or_default(),
        item.item.clone(),
        if item.purchased { "True" } else { "False" }.to_string(),
        item.category.clone(),
        item.store.clone(),
    ]
}
