// Text rendering for the history list

use crate::models::Transaction;
use crate::poller::state::{PollPhase, PollState};
use chrono::DateTime;
use std::time::Instant;

pub fn format_relative_time(timestamp: i64, now: i64) -> String {
    let minutes = now.saturating_sub(timestamp) / 60;

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes == 1 {
        return "1m ago".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = minutes / 60;
    if hours == 1 {
        return "1h ago".to_string();
    }
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    match DateTime::from_timestamp(timestamp, 0) {
        Some(at) => at.format("%Y-%m-%d").to_string(),
        None => "Invalid time".to_string(),
    }
}

/// `abcd..wxyz`, or `Unknown` for an empty address.
pub fn shorten_address(address: &str) -> String {
    if address.is_empty() {
        return "Unknown".to_string();
    }

    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}..{}", head, tail)
}

pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() {
        format!("{:.2}", amount)
    } else {
        "0.00".to_string()
    }
}

pub fn explorer_url(signature: &str) -> String {
    format!("https://solscan.io/tx/{}", signature)
}

/// One line summarising what the view is doing.
pub fn status_line(state: &PollState, now: Instant) -> Option<String> {
    match state.phase() {
        PollPhase::Loading => Some("Loading transactions...".to_string()),
        PollPhase::Polling => Some("Refreshing...".to_string()),
        PollPhase::Idle => None,
        PollPhase::Error { retry_count } => {
            let error = state.error.clone().unwrap_or_default();
            if state.is_halted() {
                Some(format!(
                    "{}\nMaximum retries reached. Press 'r' to try again.",
                    error
                ))
            } else if retry_count > 0 {
                let wait = state
                    .next_poll_at()
                    .map(|at| at.saturating_duration_since(now).as_secs())
                    .unwrap_or(0);
                Some(format!("{}\nRetrying in {} seconds...", error, wait))
            } else {
                Some(error)
            }
        }
    }
}

pub fn render_row(tx: &Transaction, now: i64) -> String {
    let kind = if tx.kind.is_empty() { "Unknown" } else { &tx.kind };

    format!(
        "{:<10} {:<16} {:>10}  {} -> {}  {}",
        shorten_address(&tx.signature),
        kind,
        format_amount(tx.amount),
        shorten_address(&tx.from),
        shorten_address(&tx.to),
        format_relative_time(tx.timestamp, now)
    )
}

pub fn render(state: &PollState, now: i64, instant: Instant) -> String {
    let mut out = Vec::new();

    if let Some(status) = status_line(state, instant) {
        out.push(status);
    }
    if state.phase() != PollPhase::Loading && state.error.is_none() {
        if state.transactions.is_empty() {
            out.push("No transactions yet".to_string());
        } else {
            out.extend(state.transactions.iter().map(|tx| render_row(tx, now)));
        }
    }

    out.join("\n")
}
