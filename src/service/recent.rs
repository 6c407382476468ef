//! In-process buffer of the most recent transactions.
//!
//! Webhook deliveries land here; the history endpoint only ever reads it.

use crate::models::Transaction;
use std::collections::VecDeque;
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum BufferError {
    #[error("Recent transaction buffer is poisoned")]
    Poisoned,
}

/// Synchronous read access to recently observed transactions.
pub trait RecentTransactions: Send + Sync {
    fn recent(&self) -> Result<Vec<Transaction>, BufferError>;
}

/// Bounded, newest-first list of transactions.
#[derive(Debug)]
pub struct RecentBuffer {
    entries: RwLock<VecDeque<Transaction>>,
    capacity: usize,
}

impl RecentBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Puts `tx` at the front, dropping an older copy with the same signature
    /// and the oldest entries beyond capacity.
    pub fn record(&self, tx: Transaction) -> Result<(), BufferError> {
        let mut entries = self.entries.write().map_err(|_| BufferError::Poisoned)?;

        entries.retain(|existing| existing.signature != tx.signature);
        debug!("Recording recent transaction {}", tx.signature);
        entries.push_front(tx);
        entries.truncate(self.capacity);

        Ok(())
    }
}

impl RecentTransactions for RecentBuffer {
    fn recent(&self) -> Result<Vec<Transaction>, BufferError> {
        let entries = self.entries.read().map_err(|_| BufferError::Poisoned)?;
        Ok(entries.iter().cloned().collect())
    }
}
