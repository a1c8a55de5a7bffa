use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::ItemId;

/// Failures reaching or decoding the backing storage
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error in {}: {}", .path.display(), .source)]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid worksheet name: {0:?}")]
    InvalidWorksheet(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by list operations
#[derive(Error, Debug)]
pub enum ListError {
    /// Bad user input; reported, state unchanged
    #[error("{0}")]
    Validation(String),

    /// Id no longer refers to a row; treated as a no-op by the interpreter
    #[error("No item with id {0}")]
    NotFound(ItemId),

    /// Storage unreachable; fatal for the invocation
    #[error("Storage error: {0}")]
    Backend(#[from] StoreError),
}

impl ListError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ListError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
