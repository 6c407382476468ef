//! Indexer result cache backed by Moka

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use super::{CacheEntry, TransactionCache};

/// Moka-backed store for the indexer result of one address.
///
/// No TTL: an expired entry must stay readable for the stale fallback, and the
/// fetcher decides whether it is fresh.
#[derive(Clone)]
pub struct TransactionCacheManager {
    cache: Cache<String, CacheEntry>,
    key: String,
}

impl TransactionCacheManager {
    /// Create a cache manager scoped to `address`
    pub fn new(address: &str) -> Self {
        let cache = Cache::builder().max_capacity(1).build();

        Self {
            cache,
            key: format!("helius:tx:{}", address),
        }
    }
}

#[async_trait]
impl TransactionCache for TransactionCacheManager {
    async fn get(&self) -> Option<CacheEntry> {
        let result = self.cache.get(&self.key).await;
        if result.is_some() {
            debug!("Cache hit for key: {}", self.key);
        } else {
            debug!("Cache miss for key: {}", self.key);
        }
        result
    }

    async fn set(&self, entry: CacheEntry) {
        let count = entry.transactions.len();
        self.cache.insert(self.key.clone(), entry).await;
        debug!("Cached {} transactions under key: {}", count, self.key);
    }
}
