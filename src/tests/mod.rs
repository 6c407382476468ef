//! Shared fixtures for the service tests

mod poller_tests;

use crate::{
    cache::{MemoryTransactionCache, TransactionCache},
    clock::ManualClock,
    helius::{ClientError, HeliusFetcher, TransactionSource, PAGE_SIZE},
    models::{HeliusTokenTransfer, HeliusTransaction, Transaction},
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TOKEN_ADDRESS: &str = "9ii1FEiWSgDzXAbwj2oTmJXzkfCw78mnHwPQv9WQ5iTn";
pub const WALLET_A: &str = "AhAkbf3cGD6HkFod2rBEE8mie8ks9p7vuss6WGkUFAM9";
pub const WALLET_B: &str = "FwKc3s5x7SguXzNPPJP7AV2UUhCF4rnEQCFdA2Q8NGCi";

/// Indexer stand-in that replays queued outcomes and counts calls.
/// Once the script runs out every call fails with a 503.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<HeliusTransaction>, ClientError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: Result<Vec<HeliusTransaction>, ClientError>) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSource for ScriptedSource {
    async fn fetch_transactions(&self, limit: usize) -> Result<Vec<HeliusTransaction>, ClientError> {
        assert_eq!(limit, PAGE_SIZE);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ClientError::Status(StatusCode::SERVICE_UNAVAILABLE)))
    }
}

pub fn helius_record(signature: &str, timestamp: i64, amount: f64) -> HeliusTransaction {
    HeliusTransaction {
        signature: signature.to_string(),
        timestamp: Some(timestamp),
        kind: Some("TRANSFER".to_string()),
        token_transfers: Some(vec![HeliusTokenTransfer {
            from_user_account: Some(WALLET_A.to_string()),
            to_user_account: Some(WALLET_B.to_string()),
            token_amount: Some(amount),
        }]),
    }
}

pub fn transaction(signature: &str, timestamp: i64) -> Transaction {
    Transaction::new(signature, timestamp, 1.0, "TRANSFER", WALLET_A, WALLET_B)
}

pub fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
}

pub struct FetcherFixture {
    pub source: Arc<ScriptedSource>,
    pub cache: Arc<dyn TransactionCache>,
    pub clock: Arc<ManualClock>,
    pub fetcher: Arc<HeliusFetcher>,
}

pub fn fetcher_with(cache: Arc<dyn TransactionCache>) -> FetcherFixture {
    let source = Arc::new(ScriptedSource::new());
    let clock = start_clock();
    let fetcher = Arc::new(HeliusFetcher::new(
        source.clone(),
        cache.clone(),
        clock.clone(),
    ));

    FetcherFixture {
        source,
        cache,
        clock,
        fetcher,
    }
}

pub fn fetcher_fixture() -> FetcherFixture {
    fetcher_with(Arc::new(MemoryTransactionCache::new()))
}
