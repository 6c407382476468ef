pub mod client;
pub mod fetcher;

// Re-exports for convenience
pub use client::{ClientError, HeliusClient, TransactionSource};
pub use fetcher::{HeliusFetcher, PAGE_SIZE};
