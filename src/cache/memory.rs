use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheEntry, TransactionCache};

/// Plain process-local slot.
#[derive(Debug, Default)]
pub struct MemoryTransactionCache {
    slot: RwLock<Option<CacheEntry>>,
}

impl MemoryTransactionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionCache for MemoryTransactionCache {
    async fn get(&self) -> Option<CacheEntry> {
        self.slot.read().await.clone()
    }

    async fn set(&self, entry: CacheEntry) {
        *self.slot.write().await = Some(entry);
    }
}
