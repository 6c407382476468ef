use super::*;
use crate::poller::{
    display, FetchKind, HistoryPoller, PollPhase, PollState, BASE_INTERVAL, MAX_INTERVAL,
    MAX_RETRIES,
};
use axum::{extract::State, http::StatusCode as HttpStatus, routing::get, Json, Router};
use std::time::{Duration, Instant};
use tokio::sync::watch;

fn loaded_state(now: Instant) -> PollState {
    let mut state = PollState::new();
    state.begin_fetch(FetchKind::Initial, now);
    state.finish_success(vec![transaction("a", 100)]);
    state
}

#[test]
fn test_mount_starts_in_loading() {
    let mut state = PollState::new();
    assert_eq!(state.phase(), PollPhase::Loading);

    state.begin_fetch(FetchKind::Initial, Instant::now());
    assert!(state.loading);
    assert!(!state.polling);
    assert_eq!(state.phase(), PollPhase::Loading);
}

#[test]
fn test_background_refresh_sets_polling_not_loading() {
    let now = Instant::now();
    let mut state = loaded_state(now);

    state.begin_fetch(FetchKind::Background, now + BASE_INTERVAL);
    assert!(state.polling);
    assert!(!state.loading);
    assert_eq!(state.phase(), PollPhase::Polling);

    state.finish_success(vec![transaction("b", 200)]);
    assert_eq!(state.phase(), PollPhase::Idle);
    assert_eq!(state.transactions[0].signature, "b");
}

#[test]
fn test_empty_result_does_not_wipe_existing_list() {
    let now = Instant::now();
    let mut state = loaded_state(now);

    state.begin_fetch(FetchKind::Background, now);
    state.finish_success(vec![]);

    assert_eq!(state.transactions.len(), 1);

    let mut fresh = PollState::new();
    fresh.begin_fetch(FetchKind::Initial, now);
    fresh.finish_success(vec![]);
    assert!(fresh.transactions.is_empty());
    assert_eq!(fresh.phase(), PollPhase::Idle);
}

#[test]
fn test_failure_without_data_shows_error() {
    let mut state = PollState::new();
    state.begin_fetch(FetchKind::Initial, Instant::now());
    state.finish_failure("connection refused");

    assert_eq!(state.phase(), PollPhase::Error { retry_count: 1 });
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to load transactions: connection refused")
    );
}

#[test]
fn test_failure_with_data_is_silent() {
    let now = Instant::now();
    let mut state = loaded_state(now);

    state.begin_fetch(FetchKind::Background, now);
    state.finish_failure("timeout");

    assert!(state.error.is_none());
    assert_eq!(state.retry_count, 1);
    assert_eq!(state.phase(), PollPhase::Idle);
    assert_eq!(state.transactions.len(), 1);
}

#[test]
fn test_non_empty_success_resets_retry_count() {
    let now = Instant::now();
    let mut state = PollState::new();
    state.begin_fetch(FetchKind::Initial, now);
    state.finish_failure("boom");
    state.begin_fetch(FetchKind::Background, now);
    state.finish_failure("boom");
    assert_eq!(state.retry_count, 2);

    state.begin_fetch(FetchKind::Background, now);
    state.finish_success(vec![]);
    assert_eq!(state.retry_count, 2, "empty results do not count as recovery");

    state.begin_fetch(FetchKind::Background, now);
    state.finish_success(vec![transaction("a", 1)]);
    assert_eq!(state.retry_count, 0);
}

#[test]
fn test_poll_interval_backs_off_to_ceiling() {
    let mut state = PollState::new();
    let expected = [60, 120, 240, 480, 600, 600];

    for (retries, secs) in expected.iter().enumerate() {
        state.retry_count = retries as u32;
        assert_eq!(state.poll_interval(), Duration::from_secs(*secs));
    }

    state.retry_count = 40;
    assert_eq!(state.poll_interval(), MAX_INTERVAL);
}

#[test]
fn test_should_poll_requires_visibility_and_spacing() {
    let now = Instant::now();
    let state = loaded_state(now);

    assert!(!state.should_poll(now + Duration::from_secs(30), true));
    assert!(!state.should_poll(now + BASE_INTERVAL, false));
    assert!(state.should_poll(now + BASE_INTERVAL, true));
    assert!(PollState::new().should_poll(now, true));
}

#[test]
fn test_polling_halts_after_three_failures_until_manual_retry() {
    let start = Instant::now();
    let mut state = PollState::new();
    let mut now = start;

    for _ in 0..MAX_RETRIES {
        assert!(state.should_poll(now, true));
        state.begin_fetch(FetchKind::Background, now);
        state.finish_failure("unreachable");
        now += MAX_INTERVAL;
    }

    assert!(state.is_halted());
    assert!(state.next_poll_at().is_none());
    for hours in 1..24 {
        assert!(!state.should_poll(now + Duration::from_secs(3600 * hours), true));
    }

    assert!(state.manual_retry());
    assert_eq!(state.retry_count, 0);
    assert!(state.should_poll(now, true));
}

#[test]
fn test_manual_retry_ignored_while_healthy() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.begin_fetch(FetchKind::Background, now);
    state.finish_failure("timeout");

    assert!(!state.manual_retry());
    assert_eq!(state.retry_count, 1);
}

#[test]
fn test_status_line_reflects_phase() {
    let now = Instant::now();
    let mut state = PollState::new();
    assert_eq!(
        display::status_line(&state, now).as_deref(),
        Some("Loading transactions...")
    );

    state.begin_fetch(FetchKind::Initial, now);
    state.finish_failure("503");
    let line = display::status_line(&state, now).unwrap();
    assert!(line.contains("Failed to load transactions: 503"));
    assert!(line.contains("Retrying in 120 seconds..."));

    state.retry_count = MAX_RETRIES;
    let line = display::status_line(&state, now).unwrap();
    assert!(line.contains("Maximum retries reached"));

    let idle = loaded_state(now);
    assert!(display::status_line(&idle, now).is_none());
}

// driver, against a real HTTP server

#[derive(Clone)]
struct Upstream {
    hits: Arc<AtomicUsize>,
    fail: Arc<std::sync::atomic::AtomicBool>,
}

async fn history_endpoint(State(upstream): State<Upstream>) -> Result<Json<Vec<Transaction>>, HttpStatus> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    if upstream.fail.load(Ordering::SeqCst) {
        Err(HttpStatus::SERVICE_UNAVAILABLE)
    } else {
        Ok(Json(vec![transaction("b", 200), transaction("a", 100)]))
    }
}

async fn serve_history(fail: bool) -> (String, Upstream) {
    let upstream = Upstream {
        hits: Arc::new(AtomicUsize::new(0)),
        fail: Arc::new(std::sync::atomic::AtomicBool::new(fail)),
    };
    let app = Router::new()
        .route("/api/transactions", get(history_endpoint))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), upstream)
}

async fn wait_for(rx: &mut watch::Receiver<PollState>, pred: impl Fn(&PollState) -> bool) -> PollState {
    wait_within(rx, Duration::from_secs(5), pred).await
}

async fn wait_within(
    rx: &mut watch::Receiver<PollState>,
    limit: Duration,
    pred: impl Fn(&PollState) -> bool,
) -> PollState {
    tokio::time::timeout(limit, async {
        loop {
            {
                let state = rx.borrow_and_update();
                if pred(&*state) {
                    return (*state).clone();
                }
            }
            rx.changed().await.expect("poller stopped");
        }
    })
    .await
    .expect("state never reached")
}

#[tokio::test]
async fn test_refresh_applies_server_response() {
    let (base, upstream) = serve_history(false).await;
    let (mut poller, _rx) = HistoryPoller::new(&base, reqwest::Client::new());

    poller.refresh(FetchKind::Initial).await;

    assert_eq!(poller.state().phase(), PollPhase::Idle);
    assert_eq!(poller.state().transactions.len(), 2);
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refresh_treats_non_2xx_as_failure() {
    let (base, _upstream) = serve_history(true).await;
    let (mut poller, rx) = HistoryPoller::new(&base, reqwest::Client::new());

    poller.refresh(FetchKind::Initial).await;

    let state = rx.borrow().clone();
    assert_eq!(state.phase(), PollPhase::Error { retry_count: 1 });
    assert!(state
        .error
        .as_deref()
        .unwrap()
        .contains("503 Service Unavailable"));
}

#[tokio::test]
async fn test_spawned_poller_recovers_on_manual_retry() {
    let (base, upstream) = serve_history(true).await;
    let mut handle = HistoryPoller::spawn(&base, reqwest::Client::new());

    let failed = wait_for(&mut handle.state, |s| s.retry_count == 1 && !s.loading).await;
    assert!(matches!(failed.phase(), PollPhase::Error { .. }));

    upstream.fail.store(false, Ordering::SeqCst);
    handle.retry().await;

    let recovered = wait_for(&mut handle.state, |s| s.transactions.len() == 2).await;
    assert_eq!(recovered.retry_count, 0);
    assert_eq!(recovered.phase(), PollPhase::Idle);
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);

    handle.unmount().await;
}

// With the runtime clock paused, sleeps and intervals jump straight to their
// deadlines, so hours of polling run instantly.
const PAUSED_LIMIT: Duration = Duration::from_secs(24 * 3600);

#[tokio::test(start_paused = true)]
async fn test_driver_stops_after_three_failed_fetches() {
    let (base, upstream) = serve_history(true).await;
    let mut handle = HistoryPoller::spawn(&base, reqwest::Client::new());

    let halted = wait_within(&mut handle.state, PAUSED_LIMIT, |s| {
        s.retry_count == MAX_RETRIES && !s.loading && !s.polling
    })
    .await;
    assert!(halted.is_halted());
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 3);

    tokio::time::sleep(Duration::from_secs(200 * 60)).await;
    handle.set_visible(false);
    handle.set_visible(true);
    tokio::time::sleep(Duration::from_secs(60 * 60)).await;

    assert_eq!(upstream.hits.load(Ordering::SeqCst), 3);
    assert_eq!(handle.state.borrow().retry_count, MAX_RETRIES);

    handle.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_pauses_while_hidden_and_resumes_on_visible() {
    let (base, upstream) = serve_history(false).await;
    let mut handle = HistoryPoller::spawn(&base, reqwest::Client::new());

    let loaded = wait_within(&mut handle.state, PAUSED_LIMIT, |s| {
        s.transactions.len() == 2 && !s.loading
    })
    .await;
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);

    handle.set_visible(false);
    tokio::time::sleep(Duration::from_secs(30 * 60)).await;
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1, "hidden view never polls");

    handle.set_visible(true);
    let refreshed = wait_within(&mut handle.state, PAUSED_LIMIT, |s| {
        s.last_request != loaded.last_request && !s.polling
    })
    .await;
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    assert_eq!(refreshed.phase(), PollPhase::Idle);

    handle.unmount().await;
}
