//! SQLite storage backend.
//!
//! Uses `rusqlite` for synchronous operations and `tokio-rusqlite` to run
//! them off the async runtime.

mod conversions;
mod error;
mod query;
mod repository;
mod schema;

pub use repository::SqliteRepository;
