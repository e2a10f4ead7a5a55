//! Fail-open cache reads and writes.
//!
//! Cache failures never reach callers of the repositories. A read reports
//! one of three outcomes and callers fall through to the store on anything
//! but [`CacheLookup::Hit`]. A write logs and reports whether it landed.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use super::{deserialize, serialize, Cache};

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    /// The key was present and decoded.
    Hit(T),
    /// The key was absent, or present but undecodable.
    Miss,
    /// The cache could not be reached.
    Unavailable,
}

impl<T> CacheLookup<T> {
    /// Returns the cached value, treating `Miss` and `Unavailable` alike.
    pub fn hit(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss | CacheLookup::Unavailable => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }
}

/// Reads and decodes a cached value.
pub async fn lookup<T, C>(cache: &C, key: &str) -> CacheLookup<T>
where
    T: DeserializeOwned,
    C: Cache + ?Sized,
{
    match cache.get(key).await {
        Ok(Some(bytes)) => match deserialize(&bytes) {
            Ok(value) => {
                tracing::trace!(key, "Cache hit");
                CacheLookup::Hit(value)
            }
            Err(err) => {
                // Treated as a miss; the next populate overwrites it.
                tracing::warn!(key, error = %err, "Cached value deserialization failed");
                CacheLookup::Miss
            }
        },
        Ok(None) => {
            tracing::trace!(key, "Cache miss");
            CacheLookup::Miss
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "Cache unavailable on read");
            CacheLookup::Unavailable
        }
    }
}

/// Encodes and stores a value. Returns `false` if the write did not land.
pub async fn populate<T, C>(cache: &C, key: &str, value: &T, ttl: Option<Duration>) -> bool
where
    T: Serialize + ?Sized,
    C: Cache + ?Sized,
{
    let bytes = match serialize(value) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to serialize value for cache");
            return false;
        }
    };

    match cache.set(key, &bytes, ttl).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to populate cache");
            false
        }
    }
}

/// Removes a key. Returns `false` if the delete did not land.
pub async fn evict<C>(cache: &C, key: &str) -> bool
where
    C: Cache + ?Sized,
{
    match cache.delete(key).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to evict cache key");
            false
        }
    }
}
