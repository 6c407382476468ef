use crate::cache::{CacheEntry, TransactionCache, CACHE_DURATION};
use crate::clock::Clock;
use crate::helius::client::{ClientError, TransactionSource};
use crate::models::Transaction;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Records requested per indexer call.
pub const PAGE_SIZE: usize = 50;

/// Indexer fetch behind a time-windowed cache with stale fallback.
///
/// `fetch` has no failure mode: every path yields the freshest data available,
/// falling back to the last stored result and then to an empty list.
pub struct HeliusFetcher {
    source: Arc<dyn TransactionSource>,
    cache: Arc<dyn TransactionCache>,
    clock: Arc<dyn Clock>,
    window: Duration,
}

impl HeliusFetcher {
    pub fn new(
        source: Arc<dyn TransactionSource>,
        cache: Arc<dyn TransactionCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            cache,
            clock,
            window: CACHE_DURATION,
        }
    }

    pub async fn fetch(&self) -> Vec<Transaction> {
        let cached = self.cache.get().await;

        if let Some(entry) = &cached {
            if entry.is_fresh(self.clock.now(), self.window) {
                debug!(
                    "Serving {} cached transactions captured at {}",
                    entry.transactions.len(),
                    entry.captured_at
                );
                return entry.transactions.clone();
            }
        }

        match self.source.fetch_transactions(PAGE_SIZE).await {
            Ok(records) => {
                let transformed: Vec<Transaction> =
                    records.into_iter().map(Transaction::from).collect();

                self.cache
                    .set(CacheEntry::new(transformed.clone(), self.clock.now()))
                    .await;
                info!("Fetched {} transactions from Helius", transformed.len());
                transformed
            }
            Err(e) => {
                match &e {
                    ClientError::RateLimited | ClientError::LocalRateLimit => {
                        warn!("{}, returning last known data", e)
                    }
                    ClientError::MissingCredentials => {
                        warn!("{}, returning last known data or empty list", e)
                    }
                    ClientError::Status(_) | ClientError::Http(_) => {
                        error!("Error fetching from Helius: {}", e)
                    }
                }
                cached.map(|entry| entry.transactions).unwrap_or_default()
            }
        }
    }
}
