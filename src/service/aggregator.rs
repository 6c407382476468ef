use crate::helius::HeliusFetcher;
use crate::models::Transaction;
use crate::service::recent::{BufferError, RecentTransactions};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Combines the recent buffer with the (cached) indexer history.
pub struct Aggregator {
    recent: Arc<dyn RecentTransactions>,
    fetcher: Arc<HeliusFetcher>,
}

impl Aggregator {
    pub fn new(recent: Arc<dyn RecentTransactions>, fetcher: Arc<HeliusFetcher>) -> Self {
        Self { recent, fetcher }
    }

    /// Buffer contents as-is; never touches the indexer.
    pub fn recent(&self) -> Result<Vec<Transaction>, AggregateError> {
        let recent = self.recent.recent()?;
        info!("Returning {} recent transactions", recent.len());
        Ok(recent)
    }

    /// Buffer followed by indexer results, deduplicated and newest first.
    pub async fn all(&self) -> Result<Vec<Transaction>, AggregateError> {
        let recent = self.recent.recent()?;
        let history = self.fetcher.fetch().await;

        let (recent_count, history_count) = (recent.len(), history.len());
        let merged = merge_transactions(recent.into_iter().chain(history));

        info!(
            "Returning all transactions: recent={}, helius={}, total={}",
            recent_count,
            history_count,
            merged.len()
        );
        Ok(merged)
    }
}

/// Deduplicates by signature and sorts by descending timestamp.
///
/// A later duplicate overwrites the fields of an earlier one but keeps the
/// earlier one's position, so ties in timestamp keep first-seen order.
pub fn merge_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Vec<Transaction> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Transaction> = Vec::new();

    for tx in transactions {
        match positions.get(&tx.signature) {
            Some(&idx) => unique[idx] = tx,
            None => {
                positions.insert(tx.signature.clone(), unique.len());
                unique.push(tx);
            }
        }
    }

    // sort_by is stable
    unique.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    unique
}
