use crate::config::{Config, HeliusCredentials};
use crate::models::HeliusTransaction;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::StatusCode;
use std::num::NonZeroU32;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit hit")]
    RateLimited,

    #[error("Helius API error: {0}")]
    Status(StatusCode),

    #[error("Missing Helius API key or token address")]
    MissingCredentials,

    #[error("Local request quota exhausted")]
    LocalRateLimit,
}

/// Anything that can hand back a page of indexer records for the token.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(&self, limit: usize) -> Result<Vec<HeliusTransaction>, ClientError>;
}

pub struct HeliusClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<HeliusCredentials>,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl HeliusClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.helius_timeout)
            .build()?;

        let limiter = config
            .helius_rate_limit
            .and_then(NonZeroU32::new)
            .map(|per_minute| RateLimiter::direct(Quota::per_minute(per_minute)));

        info!(
            "Initializing Helius client with endpoint: {}, credentials: {}, rate limit: {:?}/min",
            config.helius_api_url,
            config.helius_credentials.is_some(),
            config.helius_rate_limit
        );

        Ok(Self {
            http,
            base_url: config.helius_api_url.clone(),
            credentials: config.helius_credentials.clone(),
            limiter,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl TransactionSource for HeliusClient {
    async fn fetch_transactions(&self, limit: usize) -> Result<Vec<HeliusTransaction>, ClientError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ClientError::MissingCredentials)?;

        if let Some(limiter) = &self.limiter {
            limiter.check().map_err(|_| ClientError::LocalRateLimit)?;
        }

        let url = format!(
            "{}/v0/addresses/{}/transactions",
            self.base_url, credentials.token_address
        );
        let limit = limit.to_string();
        debug!("Fetching from Helius API: {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("api-key", credentials.api_key.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let records = response.json::<Vec<HeliusTransaction>>().await?;
        debug!("Helius API response: {} records", records.len());
        Ok(records)
    }
}
