//! Storage backend and cache-aside decorators.
//!
//! The entity store is SQLite; the decorators in [`cached`] work with any
//! implementation of the `bookcache_core::storage` traits.

pub mod cached;
pub mod sqlite;

pub use cached::{CachedRepository, QueryCache, DEFAULT_QUERY_TTL};
pub use sqlite::SqliteRepository;
