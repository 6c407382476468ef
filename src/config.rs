// Service configuration, read from the environment (and `.env` when present):
// - server listening address/port
// - Helius indexer endpoint, credentials and client-side rate limit
// - recent buffer size
// - history poller target

use crate::validation::validate_solana_address;
use dotenv::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// API key and address needed to query the indexer.
#[derive(Clone, PartialEq, Eq)]
pub struct HeliusCredentials {
    pub api_key: String,
    pub token_address: String,
}

impl fmt::Debug for HeliusCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeliusCredentials")
            .field("api_key", &"<redacted>")
            .field("token_address", &self.token_address)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub helius_api_url: String,
    pub helius_credentials: Option<HeliusCredentials>,
    pub helius_timeout: Duration,
    pub helius_rate_limit: Option<u32>,
    pub recent_buffer_capacity: usize,
    pub history_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            helius_api_url: "https://api.helius.xyz".to_string(),
            helius_credentials: None,
            helius_timeout: Duration::from_secs(10),
            helius_rate_limit: None,
            recent_buffer_capacity: 100,
            history_api_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.server_port);
        let helius_api_url = env::var("HELIUS_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.helius_api_url);
        let helius_credentials = credentials_from(
            env::var("HELIUS_API_KEY").ok(),
            env::var("TOKEN_ADDRESS").ok(),
        );
        let helius_timeout = env::var("HELIUS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.helius_timeout);
        let helius_rate_limit = env::var("HELIUS_RATE_LIMIT")
            .map(|v| v.parse().ok())
            .unwrap_or(None)
            .filter(|limit| *limit > 0);
        let recent_buffer_capacity = env::var("RECENT_BUFFER_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.recent_buffer_capacity);
        let history_api_url = env::var("HISTORY_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.history_api_url);

        Self {
            server_host,
            server_port,
            helius_api_url,
            helius_credentials,
            helius_timeout,
            helius_rate_limit,
            recent_buffer_capacity,
            history_api_url,
        }
    }
}

/// Builds credentials only when both values are present and the address is well formed.
pub fn credentials_from(
    api_key: Option<String>,
    token_address: Option<String>,
) -> Option<HeliusCredentials> {
    let api_key = api_key.filter(|k| !k.trim().is_empty())?;
    let token_address = token_address.filter(|a| !a.trim().is_empty())?;

    if let Err(e) = validate_solana_address(&token_address) {
        warn!("Ignoring TOKEN_ADDRESS: {}", e);
        return None;
    }

    Some(HeliusCredentials {
        api_key,
        token_address,
    })
}
