pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod helius;
pub mod models;
pub mod poller;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use models::Transaction;
pub use validation::{validate_solana_address, FeedKind};
pub use api::error::ApiError;
pub use api::response::NoCacheJson;
pub use api::route::{create_router, TransactionsQuery};
pub use service::{merge_transactions, Aggregator, RecentBuffer};
