//! Cache-aside decorators over the entity store.
//!
//! - [`CachedRepository`]: single entities and default listing pages, no TTL,
//!   refreshed or evicted on write.
//! - [`QueryCache`]: parameterized query results, TTL-bounded.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteRepository::new("bookcache.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let authors: CachedRepository<Author, _, _> =
//!     CachedRepository::new(store.clone(), cache.clone(), ListingInvalidation::OnWrite);
//! let queries = QueryCache::new(store, cache, DEFAULT_QUERY_TTL);
//! ```

mod query;
mod repository;

#[cfg(test)]
pub(crate) mod test_support;

pub use query::{QueryCache, DEFAULT_QUERY_TTL};
pub use repository::CachedRepository;
