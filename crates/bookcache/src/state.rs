//! Application state shared by every request handler.
//!
//! The entity store is always SQLite. The cache backend is picked at compile
//! time by the `memory` or `redis` feature and shared by the entity
//! decorators and the query cache.

use std::sync::Arc;

use bookcache_core::cache::Cache;
use bookcache_core::catalog::{Author, Book};

use crate::config::Config;
use crate::storage::{CachedRepository, QueryCache, SqliteRepository};

pub type AuthorStore = CachedRepository<Author, SqliteRepository, dyn Cache>;
pub type BookStore = CachedRepository<Book, SqliteRepository, dyn Cache>;
pub type QueryStore = QueryCache<SqliteRepository, dyn Cache>;

/// Shared application state.
///
/// Cloned for each request; every member is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub authors: AuthorStore,
    pub books: BookStore,
    pub queries: QueryStore,
    pub config: Arc<Config>,
}

impl AppState {
    /// Opens the SQLite store at `config.sqlite_path` and wires it to `cache`.
    pub async fn with_cache(config: Config, cache: Arc<dyn Cache>) -> anyhow::Result<Self> {
        let store = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);

        let authors = CachedRepository::new(
            store.clone(),
            cache.clone(),
            config.listing_invalidation,
        );
        let books = CachedRepository::new(store.clone(), cache.clone(), config.listing_invalidation);
        let queries = QueryCache::new(store, cache, config.query_cache_ttl());

        tracing::debug!(
            sqlite_path = %config.sqlite_path,
            listing_invalidation = %authors.invalidation(),
            query_cache_ttl = ?queries.default_ttl(),
            "Storage initialized"
        );

        Ok(Self {
            authors,
            books,
            queries,
            config: Arc::new(config),
        })
    }
}

#[cfg(feature = "memory")]
mod memory_backend {
    use super::*;
    use crate::cache::MemoryCache;

    impl AppState {
        /// Creates state backed by SQLite and the in-process LRU cache.
        pub async fn new(config: Config) -> anyhow::Result<Self> {
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
            tracing::info!(max_entries = config.cache_max_entries, "Using memory cache");
            Self::with_cache(config, cache).await
        }
    }
}

#[cfg(feature = "redis")]
mod redis_backend {
    use super::*;
    use crate::cache::RedisCache;

    impl AppState {
        /// Creates state backed by SQLite and Redis.
        pub async fn new(config: Config) -> anyhow::Result<Self> {
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            tracing::info!(redis_url = %config.redis_url, "Using redis cache");
            Self::with_cache(config, cache).await
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use bookcache_core::cache::ListingInvalidation;

    use crate::storage::cached::test_support::MockCache;

    pub fn test_config() -> Config {
        Config {
            cache_max_entries: 1_000,
            query_cache_ttl_seconds: 60,
            sqlite_path: ":memory:".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            listing_invalidation: ListingInvalidation::OnWrite,
            pagination_limit: 10,
            pagination_max_limit: 100,
            pagination_max_page: 1_000,
        }
    }

    /// State over an in-memory database and an inspectable cache.
    pub async fn test_state() -> (AppState, Arc<MockCache>) {
        let cache = Arc::new(MockCache::new());
        let state = AppState::with_cache(test_config(), cache.clone())
            .await
            .unwrap();
        (state, cache)
    }
}
