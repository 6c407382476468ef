use crate::models::Transaction;
use crate::poller::state::{FetchKind, PollState};
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::interval_at;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum PollError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch transactions: {0}")]
    Status(StatusCode),
}

/// Drives a [`PollState`] against `GET {base}/api/transactions`.
pub struct HistoryPoller {
    http: reqwest::Client,
    url: String,
    state: PollState,
    updates: watch::Sender<PollState>,
    request_count: u64,
}

/// Controls for a running poller.
pub struct PollerHandle {
    pub state: watch::Receiver<PollState>,
    visibility: watch::Sender<bool>,
    retries: mpsc::Sender<()>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn set_visible(&self, visible: bool) {
        self.visibility.send_replace(visible);
    }

    pub async fn retry(&self) {
        if self.retries.send(()).await.is_err() {
            debug!("Poller already stopped, ignoring retry");
        }
    }

    /// Detaches the timer and listeners. A request already in flight is left
    /// to complete.
    pub async fn unmount(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

impl HistoryPoller {
    pub fn new(base_url: &str, http: reqwest::Client) -> (Self, watch::Receiver<PollState>) {
        let state = PollState::new();
        let (updates, receiver) = watch::channel(state.clone());

        let poller = Self {
            http,
            url: format!("{}/api/transactions", base_url.trim_end_matches('/')),
            state,
            updates,
            request_count: 0,
        };
        (poller, receiver)
    }

    /// Mounts the poller on a background task.
    pub fn spawn(base_url: &str, http: reqwest::Client) -> PollerHandle {
        let (poller, state) = Self::new(base_url, http);
        let (visibility, visibility_rx) = watch::channel(true);
        let (retries, retries_rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            poller.run(visibility_rx, retries_rx, task_cancel).await;
        });

        PollerHandle {
            state,
            visibility,
            retries,
            cancel,
            task,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// One fetch cycle: mark in flight, request, fold the outcome back in.
    pub async fn refresh(&mut self, kind: FetchKind) {
        let now = clock_now();
        if let Some(last) = self.state.last_request {
            debug!(
                "Time since last request: {}s",
                now.saturating_duration_since(last).as_secs()
            );
        }
        self.request_count += 1;
        debug!(
            "Fetching transactions: {:?}, retry_count={}, total_requests={}, poll_interval={:?}",
            kind,
            self.state.retry_count,
            self.request_count,
            self.state.poll_interval()
        );

        self.state.begin_fetch(kind, now);
        self.publish();

        match self.fetch_list().await {
            Ok(transactions) => {
                debug!("Transactions received: {}", transactions.len());
                self.state.finish_success(transactions);
            }
            Err(e) => {
                error!("Error fetching transactions: {}", e);
                self.state.finish_failure(&e.to_string());
            }
        }
        self.publish();
    }

    async fn fetch_list(&self) -> Result<Vec<Transaction>, PollError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }
        Ok(response.json::<Vec<Transaction>>().await?)
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }

    pub async fn run(
        mut self,
        mut visibility: watch::Receiver<bool>,
        mut retries: mpsc::Receiver<()>,
        cancel: CancellationToken,
    ) {
        info!("Mounting history poller for {}", self.url);
        self.refresh(FetchKind::Initial).await;

        let mut period = self.state.poll_interval();
        let mut ticker = ticker_for(period);
        let mut visibility_open = true;
        let mut retries_open = true;
        let mut was_halted = self.state.is_halted();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Unmounting history poller");
                    break;
                }
                _ = ticker.tick(), if !self.state.is_halted() => {
                    if self.state.should_poll(clock_now(), *visibility.borrow()) {
                        self.refresh(FetchKind::Background).await;
                    }
                }
                changed = visibility.changed(), if visibility_open => {
                    if changed.is_err() {
                        visibility_open = false;
                        continue;
                    }
                    let visible = *visibility.borrow_and_update();
                    if self.state.should_poll(clock_now(), visible) {
                        self.refresh(FetchKind::Background).await;
                    }
                }
                request = retries.recv(), if retries_open => {
                    match request {
                        Some(()) => {
                            if self.state.manual_retry() {
                                info!("Manual retry requested");
                                self.publish();
                                self.refresh(FetchKind::Initial).await;
                            }
                        }
                        None => retries_open = false,
                    }
                }
            }

            let halted = self.state.is_halted();
            if halted && !was_halted {
                info!("Maximum retries reached, stopping polling");
            }
            was_halted = halted;

            let next = self.state.poll_interval();
            if next != period {
                period = next;
                ticker = ticker_for(period);
            }
        }
    }
}

// Follows the tokio clock, which tests may pause.
fn clock_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

fn ticker_for(period: Duration) -> tokio::time::Interval {
    interval_at(tokio::time::Instant::now() + period, period)
}
