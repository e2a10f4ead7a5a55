//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use bookcache_core::catalog::{Author, Book};
use chrono::NaiveDate;
use rusqlite::types::{Type, ValueRef};
use rusqlite::Row;
use serde_json::Value;

/// Convert a SQLite row to an Author.
///
/// Expected columns: id, name, bio, birth_date
pub fn row_to_author(row: &Row) -> rusqlite::Result<Author> {
    let birth_date: String = row.get(3)?;

    Ok(Author {
        id: row.get(0)?,
        name: row.get(1)?,
        bio: row.get(2)?,
        birth_date: parse_date(3, &birth_date)?,
    })
}

/// Convert a SQLite row to a Book.
///
/// Expected columns: id, title, description, publish_date, author_id
pub fn row_to_book(row: &Row) -> rusqlite::Result<Book> {
    let publish_date: String = row.get(3)?;

    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        publish_date: parse_date(3, &publish_date)?,
        author_id: row.get(4)?,
    })
}

/// Convert a raw column value to JSON for query result rows.
///
/// Dates are stored as ISO-8601 text, so they come out as the same strings
/// the entity serializers produce.
pub fn value_ref_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}

/// Parse a date from ISO 8601 string (YYYY-MM-DD).
fn parse_date(column: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Format a NaiveDate for SQLite storage (YYYY-MM-DD).
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// SQLite integers are signed; windows past `i64::MAX` saturate.
pub fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Convert an optional text column to a bindable value.
pub fn text_or_null(value: Option<String>) -> rusqlite::types::Value {
    value.map_or(rusqlite::types::Value::Null, rusqlite::types::Value::Text)
}
