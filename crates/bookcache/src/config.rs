use std::{env, time::Duration};

use bookcache_core::cache::ListingInvalidation;

use crate::storage::DEFAULT_QUERY_TTL;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Lifetime of cached query results in seconds (default: 60)
    pub query_cache_ttl_seconds: u64,
    /// Path to SQLite database file (default: "bookcache.db")
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// What happens to cached listing pages after a write (default: on-write)
    pub listing_invalidation: ListingInvalidation,
    /// Page size used when a request does not specify one (default: 10)
    pub pagination_limit: u64,
    /// Largest page size a request may ask for (default: 100)
    pub pagination_max_limit: u64,
    /// Largest page number a request may ask for (default: 1,000)
    ///
    /// Listing pages are cached without a TTL, so this bounds the number of
    /// listing keys per page size.
    pub pagination_max_page: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `QUERY_CACHE_TTL_SECONDS` - Query cache TTL in seconds (default: 60)
    /// - `SQLITE_PATH` - SQLite database path (default: "bookcache.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `LISTING_INVALIDATION` - `on-write` or `manual` (default: `on-write`)
    /// - `PAGINATION_LIMIT` - Default page size (default: 10)
    /// - `PAGINATION_MAX_LIMIT` - Maximum page size (default: 100)
    /// - `PAGINATION_MAX_PAGE` - Maximum page number (default: 1,000)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            query_cache_ttl_seconds: env::var("QUERY_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_QUERY_TTL.as_secs()),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "bookcache.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            listing_invalidation: env::var("LISTING_INVALIDATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            pagination_limit: env::var("PAGINATION_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(10),
            pagination_max_limit: env::var("PAGINATION_MAX_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(100),
            pagination_max_page: env::var("PAGINATION_MAX_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
        }
    }

    /// Get the query cache TTL as a Duration.
    pub fn query_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.query_cache_ttl_seconds)
    }
}
