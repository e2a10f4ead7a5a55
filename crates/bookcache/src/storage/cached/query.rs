//! TTL-bounded cache for parameterized queries.
//!
//! Entries are keyed by the full parameter set and are never invalidated
//! explicitly: a write to the store shows up once the entry expires.

use std::sync::Arc;
use std::time::Duration;

use bookcache_core::cache::{lookup, populate, query_key, Cache, CacheLookup};
use bookcache_core::query::{QueryPage, QueryParams, QueryPlan};
use bookcache_core::storage::{QueryRepository, Result};

/// Default lifetime of a cached query result.
pub const DEFAULT_QUERY_TTL: Duration = Duration::from_secs(60);

pub struct QueryCache<S: ?Sized, C: ?Sized> {
    store: Arc<S>,
    cache: Arc<C>,
    default_ttl: Duration,
}

impl<S: ?Sized, C: ?Sized> Clone for QueryCache<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            default_ttl: self.default_ttl,
        }
    }
}

impl<S, C> QueryCache<S, C>
where
    S: QueryRepository + ?Sized,
    C: Cache + ?Sized,
{
    pub fn new(store: Arc<S>, cache: Arc<C>, default_ttl: Duration) -> Self {
        Self {
            store,
            cache,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Runs a query through the cache.
    ///
    /// A hit returns exactly what was stored. On a miss the parameters are
    /// validated, the store is queried and the result is cached for `ttl`
    /// (or the default TTL).
    ///
    /// # Errors
    ///
    /// `RepositoryError::InvalidData` for join keys that are not schema
    /// fields, plus any store error. Cache failures are never returned.
    pub async fn query(&self, params: &QueryParams, ttl: Option<Duration>) -> Result<QueryPage> {
        let key = query_key(params);

        if let CacheLookup::Hit(page) = lookup::<QueryPage, _>(&*self.cache, &key).await {
            return Ok(page);
        }

        let plan = QueryPlan::build(params)?;
        if !plan.ignored_fields.is_empty() {
            tracing::debug!(
                model = %params.kind,
                ignored = ?plan.ignored_fields,
                "Dropped unknown query fields"
            );
        }

        let page = self.store.query(&plan).await?;
        populate(&*self.cache, &key, &page, Some(ttl.unwrap_or(self.default_ttl))).await;

        Ok(page)
    }
}
