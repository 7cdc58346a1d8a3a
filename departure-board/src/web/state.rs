//! Application state for the web layer.

use std::sync::Arc;

use crate::board::{Board, PollerHandle};
use crate::timetable::Clock;

/// Shared application state.
///
/// Generic over the departures source so the router can be served against
/// the live API or a mock.
pub struct AppState<S> {
    /// Live board fed by the poller
    pub board: Arc<Board>,

    /// Handle to the polling task, for manual retries
    pub poller: Arc<PollerHandle>,

    /// Departures source, for health checks
    pub source: Arc<S>,

    /// Station clock for the timetable fallback
    pub clock: Arc<dyn Clock>,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(
        board: Arc<Board>,
        poller: PollerHandle,
        source: Arc<S>,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            board,
            poller: Arc::new(poller),
            source,
            clock: Arc::new(clock),
        }
    }
}

// Manual impl: `S` itself need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            poller: self.poller.clone(),
            source: self.source.clone(),
            clock: self.clock.clone(),
        }
    }
}
