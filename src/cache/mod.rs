//! Cache layer
//!
//! In-memory caching for hot read paths (video lookups, channel
//! profiles). Entries are serialized to JSON so the same cache can hold
//! heterogeneous value types under one key space.

pub mod memory;

pub use memory::MemoryCache;

use crate::config::CacheConfig;
use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Unified cache handle shared across services.
#[derive(Debug)]
pub struct Cache {
    inner: MemoryCache,
}

impl Cache {
    /// Get a value from cache
    pub async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        self.inner.get(key).await
    }

    /// Set a value in cache with TTL
    pub async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        self.inner.set(key, value, ttl).await
    }

    /// Delete a value from cache
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }

    /// Delete all values whose key starts with the given prefix
    pub async fn delete_prefix(&self, prefix: &str) -> Result<()> {
        self.inner.delete_prefix(prefix).await
    }

    /// Clear all cache entries
    pub async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }
}

/// Create a cache instance based on configuration
pub fn create_cache(config: &CacheConfig) -> Arc<Cache> {
    let ttl = Duration::from_secs(config.ttl_seconds);
    Arc::new(Cache {
        inner: MemoryCache::with_capacity_and_ttl(config.max_entries, ttl),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_cache_round_trip() {
        let cache = create_cache(&CacheConfig::default());
        cache
            .set("key", &"value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let result: Option<String> = cache.get("key").await.unwrap();
        assert_eq!(result, Some("value".to_string()));

        cache.delete("key").await.unwrap();
        let result: Option<String> = cache.get("key").await.unwrap();
        assert_eq!(result, None);
    }
}
