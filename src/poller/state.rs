//! Retry/backoff state for the transaction history view.
//!
//! Everything here is pure: callers pass in the current time and visibility,
//! and the driver performs the actual I/O.

use crate::models::Transaction;
use std::time::{Duration, Instant};

/// Shortest polling interval, and the minimum gap between two requests.
pub const BASE_INTERVAL: Duration = Duration::from_secs(60);
/// Backoff ceiling for the polling interval.
pub const MAX_INTERVAL: Duration = Duration::from_secs(600);
/// Consecutive failures after which automatic polling stops.
pub const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// No data yet, first fetch in flight.
    Loading,
    Idle,
    /// Background refresh while data is shown.
    Polling,
    /// No data and the last fetch failed.
    Error { retry_count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Mount or manual retry.
    Initial,
    /// Timer tick or visibility change.
    Background,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollState {
    pub transactions: Vec<Transaction>,
    pub loading: bool,
    pub polling: bool,
    pub error: Option<String>,
    pub retry_count: u32,
    pub last_request: Option<Instant>,
}

impl Default for PollState {
    fn default() -> Self {
        Self::new()
    }
}

impl PollState {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            loading: true,
            polling: false,
            error: None,
            retry_count: 0,
            last_request: None,
        }
    }

    pub fn phase(&self) -> PollPhase {
        if self.loading && self.transactions.is_empty() {
            PollPhase::Loading
        } else if self.error.is_some() {
            PollPhase::Error {
                retry_count: self.retry_count,
            }
        } else if self.polling {
            PollPhase::Polling
        } else {
            PollPhase::Idle
        }
    }

    pub fn begin_fetch(&mut self, kind: FetchKind, now: Instant) {
        if kind == FetchKind::Initial && self.transactions.is_empty() {
            self.loading = true;
        } else {
            self.polling = true;
        }
        self.error = None;
        self.last_request = Some(now);
    }

    pub fn finish_success(&mut self, transactions: Vec<Transaction>) {
        if !transactions.is_empty() {
            self.transactions = transactions;
            self.retry_count = 0;
        } else if self.transactions.is_empty() {
            // an empty answer never wipes a list that is already shown
            self.transactions = transactions;
        }
        self.loading = false;
        self.polling = false;
    }

    pub fn finish_failure(&mut self, message: &str) {
        if self.transactions.is_empty() {
            self.error = Some(format!("Failed to load transactions: {}", message));
        }
        self.retry_count += 1;
        self.loading = false;
        self.polling = false;
    }

    /// `min(BASE_INTERVAL * 2^retry_count, MAX_INTERVAL)`
    pub fn poll_interval(&self) -> Duration {
        BASE_INTERVAL
            .checked_mul(2u32.saturating_pow(self.retry_count))
            .map_or(MAX_INTERVAL, |interval| interval.min(MAX_INTERVAL))
    }

    pub fn is_halted(&self) -> bool {
        self.retry_count >= MAX_RETRIES
    }

    /// Whether a timer tick or visibility change may hit the network now.
    pub fn should_poll(&self, now: Instant, visible: bool) -> bool {
        if self.is_halted() || !visible {
            return false;
        }
        match self.last_request {
            Some(last) => now.saturating_duration_since(last) >= BASE_INTERVAL,
            None => true,
        }
    }

    /// When the next automatic fetch is expected, if any.
    pub fn next_poll_at(&self) -> Option<Instant> {
        if self.is_halted() {
            return None;
        }
        let last = self.last_request?;
        Some(last + self.poll_interval().max(BASE_INTERVAL))
    }

    /// Resets the backoff. Only honoured while an error is shown or polling
    /// has halted; returns whether the caller should issue an initial fetch.
    pub fn manual_retry(&mut self) -> bool {
        let allowed = matches!(self.phase(), PollPhase::Error { .. }) || self.is_halted();
        if allowed {
            self.retry_count = 0;
        }
        allowed
    }
}
