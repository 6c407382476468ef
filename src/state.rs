use crate::cache::TransactionCacheManager;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::helius::{ClientError, HeliusClient, HeliusFetcher};
use crate::service::{Aggregator, RecentBuffer};
use std::sync::Arc;
use tracing::warn;

pub struct AppState {
    pub aggregator: Aggregator,
}

impl AppState {
    /// Wires the production collaborators: Helius client, Moka cache, system clock.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = HeliusClient::new(config)?;
        if !client.has_credentials() {
            warn!("Missing Helius API key or token address, history will come from the recent buffer only");
        }

        let cache_scope = config
            .helius_credentials
            .as_ref()
            .map(|c| c.token_address.as_str())
            .unwrap_or("unconfigured");
        let cache = Arc::new(TransactionCacheManager::new(cache_scope));
        let fetcher = Arc::new(HeliusFetcher::new(Arc::new(client), cache, Arc::new(SystemClock)));

        let recent = Arc::new(RecentBuffer::new(config.recent_buffer_capacity));

        Ok(Self {
            aggregator: Aggregator::new(recent, fetcher),
        })
    }
}
