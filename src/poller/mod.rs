pub mod display;
pub mod driver;
pub mod state;

pub use driver::{HistoryPoller, PollError, PollerHandle};
pub use state::{FetchKind, PollPhase, PollState, BASE_INTERVAL, MAX_INTERVAL, MAX_RETRIES};
