// Terminal view of the transaction history: polls the service and redraws on
// every state change. `r` + Enter retries after errors, Ctrl-C exits.

use token_history_service::config::Config;
use token_history_service::poller::{display, HistoryPoller};

use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    info!("Polling transaction history from {}", config.history_api_url);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let mut poller = HistoryPoller::spawn(&config.history_api_url, http);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = poller.state.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = poller.state.borrow_and_update().clone();
                let now = chrono::Utc::now().timestamp();
                println!("\n{}", display::render(&state, now, Instant::now()));
            }
            line = stdin.next_line() => {
                match line? {
                    Some(input) if input.trim() == "r" => poller.retry().await,
                    Some(_) => {}
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received");
                break;
            }
        }
    }

    poller.unmount().await;
    Ok(())
}
