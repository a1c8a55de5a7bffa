//! Worksheet schema for the SQLite backend
//!
//! A worksheet is one table whose columns mirror the list header. All cells
//! are TEXT so that hand-edited or legacy worksheets load the same way a
//! CSV file does.

use crate::error::StoreError;
use crate::model::COLUMNS;

/// Worksheet names: non-empty, no control characters, not SQLite-internal
pub fn validate_worksheet(name: &str) -> Result<(), StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.len() != name.len()
        || name.chars().any(char::is_control)
        || name.to_ascii_lowercase().starts_with("sqlite_")
    {
        return Err(StoreError::InvalidWorksheet(name.to_string()));
    }
    Ok(())
}

/// Double-quote an identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn create_worksheet(name: &str) -> String {
    let columns = COLUMNS
        .iter()
        .map(|c| format!("{} TEXT", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({})", quote_ident(name), columns)
}

pub(crate) fn add_column(worksheet: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {} TEXT",
        quote_ident(worksheet),
        quote_ident(column)
    )
}

pub(crate) fn insert_row(worksheet: &str) -> String {
    let columns = COLUMNS
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(worksheet),
        columns,
        placeholders
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worksheet_names() {
        assert!(validate_worksheet("shopping_list").is_ok());
        assert!(validate_worksheet("Shopping List \"v2\"").is_ok());
        assert!(validate_worksheet("").is_err());
        assert!(validate_worksheet(" padded").is_err());
        assert!(validate_worksheet("sqlite_master").is_err());
        assert!(validate_worksheet("tab\there").is_err());
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_ident("list"), "\"list\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(
            insert_row("w"),
            concat!(
                "INSERT INTO \"w\" ",
                "(\"id\", \"timestamp\", \"item\", \"purchased\", \"category\", \"store\") ",
                "VALUES (?, ?, ?, ?, ?, ?)"
            )
        );
    }
}
