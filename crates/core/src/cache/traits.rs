use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key-value cache store shared by every repository.
///
/// Implementations must be safe to call concurrently. No operation is
/// transactional across keys.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists every live key matching a glob pattern (e.g. `"authors:*"`).
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Deletes every key matching a pattern, returning how many were removed.
    ///
    /// The scan and the deletes are separate steps: keys written after the
    /// scan are not removed.
    async fn delete_pattern(&self, pattern: &str) -> Result<usize> {
        let keys = self.scan_keys(pattern).await?;
        for key in &keys {
            self.delete(key).await?;
        }
        Ok(keys.len())
    }
}
