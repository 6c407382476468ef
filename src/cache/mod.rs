//! Storage for the last successful indexer result.
//!
//! The fetcher only needs "give me what you have, with its capture time" and
//! "replace it". Freshness is judged by the caller, so a backing store must keep
//! stale entries around: they are the fallback when the indexer misbehaves.

pub mod memory;
pub mod transaction;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::models::Transaction;

pub use memory::MemoryTransactionCache;
pub use transaction::TransactionCacheManager;

/// How long an indexer result is served without going back upstream.
pub const CACHE_DURATION: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub transactions: Vec<Transaction>,
    pub captured_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(transactions: Vec<Transaction>, captured_at: DateTime<Utc>) -> Self {
        Self {
            transactions,
            captured_at,
        }
    }

    /// Fresh while `now - captured_at < window`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match (now - self.captured_at).to_std() {
            Ok(age) => age < window,
            // captured in the future (clock went backwards)
            Err(_) => true,
        }
    }
}

#[async_trait]
pub trait TransactionCache: Send + Sync {
    async fn get(&self) -> Option<CacheEntry>;

    /// Replaces whatever was stored before.
    async fn set(&self, entry: CacheEntry);
}
