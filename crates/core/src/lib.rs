//! Functional core for bookcache.
//!
//! Domain types, cache key layout, serialization and the repository traits
//! live here. Concrete backends (SQLite, Redis, in-memory LRU) live in the
//! `bookcache` crate.

pub mod cache;
pub mod catalog;
pub mod query;
pub mod storage;
