pub mod aggregator;
pub mod recent;

pub use aggregator::{merge_transactions, AggregateError, Aggregator};
pub use recent::{BufferError, RecentBuffer, RecentTransactions};
