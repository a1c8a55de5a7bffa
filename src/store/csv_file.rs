//! Local CSV file backend

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::model::Table;
use crate::normalize::RawTable;

use super::{encode_row, header, RowStore};

pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RowStore for CsvFileStore {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load_raw(&self) -> Result<RawTable, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, starting empty", self.path.display());
                return Ok(RawTable::new(header()));
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(RawTable::new(header()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| StoreError::csv(&self.path, e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut raw = RawTable::new(columns);
        for record in reader.records() {
            let record = record.map_err(|e| StoreError::csv(&self.path, e))?;
            raw.rows.push(
                record
                    .iter()
                    .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                    .collect(),
            );
        }
        Ok(raw)
    }

    fn save(&self, table: &Table) -> Result<(), StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(header())
            .map_err(|e| StoreError::csv(&self.path, e))?;
        for row in table.rows() {
            writer
                .write_record(encode_row(row))
                .map_err(|e| StoreError::csv(&self.path, e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::io(&self.path, e.into_error()))?;

        // Write beside the target, then swap it in
        let tmp = self.temp_path();
        fs::write(&tmp, bytes).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!("Saved {} items to {}", table.len(), self.describe());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemId;
    use crate::mutate;
    use crate::store::testing::sample_table;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvFileStore::new(dir.path().join("nope.csv"));
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.csv");
        fs::write(&path, "\n  \n").unwrap();
        assert!(CsvFileStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = CsvFileStore::new(dir.path().join("nested/dir/list.csv"));
        let table = sample_table();

        store.save(&table).unwrap();
        assert_eq!(store.load().unwrap(), table);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_writes_canonical_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.csv");
        let store = CsvFileStore::new(&path);
        store.save(&Table::new()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "id,timestamp,item,purchased,category,store");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_legacy_file_is_normalized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shopping_list.csv");
        fs::write(
            &path,
            "timestamp,item,purchased\n\
             2024-01-02 03:04:05.678901,Milk,False\n\
             2024-01-02 03:05:00.000000,Eggs,True\n",
        )
        .unwrap();

        let table = CsvFileStore::new(&path).load().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].item, "Milk");
        assert!(!table.rows()[0].purchased);
        assert!(table.rows()[1].purchased);
        assert_eq!(table.rows()[1].category, "Uncategorized");
        assert_eq!(table.rows()[1].store, "Other");
        assert!(table.rows()[0].timestamp.is_some());
        assert_eq!(table.rows()[1].id, ItemId(1));
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a list file
        let store = CsvFileStore::new(dir.path());
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_last_writer_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.csv");
        let first = CsvFileStore::new(&path);
        let second = CsvFileStore::new(&path);

        let a = first.load().unwrap();
        let b = second.load().unwrap();

        first
            .save(&mutate::add(&a, "Milk", "Meat/Dairy", "Costco").unwrap())
            .unwrap();
        second
            .save(&mutate::add(&b, "Eggs", "Meat/Dairy", "Costco").unwrap())
            .unwrap();

        let result = first.load().unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.contains_name("Eggs"));
        assert!(!result.contains_name("Milk"));
    }
}
