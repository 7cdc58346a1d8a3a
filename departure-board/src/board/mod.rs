//! Live departure board: shared state and the polling loop that feeds it.

mod poller;
mod state;

pub use poller::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, Poller, PollerHandle};
pub use state::{Board, BoardState, BoardView, DEFAULT_DISPLAY_LIMIT, Phase};
