//! Board state: the latest snapshot plus loading/error status.
//!
//! The board starts in [`Phase::Loading`] and never returns to it. Every
//! fetch outcome moves it to `Live` or `Failed`; a failure keeps whatever
//! snapshot was last shown so the screen is not blanked.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::departures::{Departure, FetchError, Snapshot};

/// How many departures the board shows.
pub const DEFAULT_DISPLAY_LIMIT: usize = 5;

/// Fetch status of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No fetch has completed yet.
    Loading,
    /// Last applied fetch succeeded.
    Live,
    /// Last applied fetch failed.
    Failed { message: String },
}

/// What the board should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoardView {
    Loading,
    /// At least one departure to show. `error` is set when the latest fetch
    /// failed and these are retained from an earlier one.
    Departures {
        departures: Vec<Departure>,
        last_updated: Option<String>,
        updating: bool,
        error: Option<String>,
    },
    /// A snapshot is held but it lists no trains.
    NoDepartures {
        last_updated: Option<String>,
        error: Option<String>,
    },
    /// Fetching failed and there is nothing to fall back on.
    Error { message: String },
}

impl BoardView {
    pub fn error(&self) -> Option<&str> {
        match self {
            BoardView::Departures { error, .. } | BoardView::NoDepartures { error, .. } => {
                error.as_deref()
            }
            BoardView::Error { message } => Some(message),
            BoardView::Loading => None,
        }
    }
}

/// Plain board state, without synchronisation.
#[derive(Debug, Clone)]
pub struct BoardState {
    phase: Phase,
    snapshot: Option<Arc<Snapshot>>,
    /// Sequence number of the fetch currently applied; 0 before any.
    applied_seq: u64,
}

impl BoardState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            snapshot: None,
            applied_seq: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.snapshot.as_ref()
    }

    /// Apply the outcome of fetch number `seq`.
    ///
    /// Outcomes older than the one already applied are dropped, so a slow
    /// early response cannot overwrite a newer board. Returns whether the
    /// outcome was applied.
    pub fn apply(&mut self, seq: u64, result: Result<Snapshot, FetchError>) -> bool {
        if seq < self.applied_seq {
            debug!(seq, applied = self.applied_seq, "discarding stale fetch result");
            return false;
        }
        self.applied_seq = seq;

        match result {
            Ok(snapshot) => {
                info!(
                    seq,
                    departures = snapshot.departures.len(),
                    last_updated = snapshot.last_updated.as_deref().unwrap_or("-"),
                    "departures updated"
                );
                for dep in &snapshot.departures {
                    debug!(
                        scheduled = %dep.scheduled_time,
                        live = dep.live_time.as_deref().unwrap_or("-"),
                        destination = %dep.destination,
                        at_platform = dep.at_platform,
                        disrupted = dep.is_disrupted(),
                        "departure"
                    );
                }
                self.snapshot = Some(Arc::new(snapshot));
                self.phase = Phase::Live;
            }
            Err(e) => {
                warn!(seq, error = %e, "failed to fetch departures");
                self.phase = Phase::Failed {
                    message: format!("Unable to load departures: {e}"),
                };
            }
        }
        true
    }

    /// Render the state, showing at most `limit` departures in snapshot order.
    pub fn view(&self, limit: usize) -> BoardView {
        let error = match &self.phase {
            Phase::Loading => return BoardView::Loading,
            Phase::Live => None,
            Phase::Failed { message } => Some(message.clone()),
        };

        let Some(snapshot) = &self.snapshot else {
            return BoardView::Error {
                message: error.unwrap_or_default(),
            };
        };

        if snapshot.departures.is_empty() {
            return BoardView::NoDepartures {
                last_updated: snapshot.last_updated.clone(),
                error,
            };
        }

        BoardView::Departures {
            departures: snapshot.departures.iter().take(limit).cloned().collect(),
            last_updated: snapshot.last_updated.clone(),
            updating: snapshot.updating,
            error,
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared board, updated by the poller and read by the web layer.
#[derive(Debug)]
pub struct Board {
    state: RwLock<BoardState>,
    next_seq: AtomicU64,
    limit: usize,
}

impl Board {
    pub fn new(limit: usize) -> Self {
        Self {
            state: RwLock::new(BoardState::new()),
            next_seq: AtomicU64::new(1),
            limit,
        }
    }

    /// Reserve the sequence number for a fetch about to start.
    pub fn begin_fetch(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst)
    }

    pub async fn apply(&self, seq: u64, result: Result<Snapshot, FetchError>) -> bool {
        self.state.write().await.apply(seq, result)
    }

    /// Apply only if `active` is still set once the write lock is held.
    ///
    /// The flag is checked under the lock, so a result cannot land after a
    /// stop that happened while it was waiting for the lock.
    pub async fn apply_while(
        &self,
        seq: u64,
        result: Result<Snapshot, FetchError>,
        active: &AtomicBool,
    ) -> bool {
        let mut state = self.state.write().await;
        if !active.load(Ordering::SeqCst) {
            debug!(seq, "poller stopped, ignoring fetch result");
            return false;
        }
        state.apply(seq, result)
    }

    pub async fn view(&self) -> BoardView {
        self.state.read().await.view(self.limit)
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase().clone()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(times: &[&str]) -> Snapshot {
        Snapshot {
            departures: times
                .iter()
                .map(|t| Departure::new(*t, "Flinders Street"))
                .collect(),
            last_updated: Some("08:00".to_string()),
            updating: false,
        }
    }

    fn status_error() -> FetchError {
        FetchError::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        }
    }

    fn shown_times(view: &BoardView) -> Vec<String> {
        match view {
            BoardView::Departures { departures, .. } => departures
                .iter()
                .map(|d| d.scheduled_time.clone())
                .collect(),
            other => panic!("expected departures, got {other:?}"),
        }
    }

    #[test]
    fn starts_loading() {
        let state = BoardState::new();
        assert_eq!(state.phase(), &Phase::Loading);
        assert_eq!(state.view(5), BoardView::Loading);
    }

    #[test]
    fn shows_first_five_in_order() {
        let mut state = BoardState::new();
        let seven = ["08:05", "08:25", "08:45", "09:15", "09:45", "10:45", "12:15"];
        assert!(state.apply(1, Ok(snapshot(&seven))));

        assert_eq!(state.phase(), &Phase::Live);
        assert_eq!(shown_times(&state.view(5)), &seven[..5]);
    }

    #[test]
    fn empty_snapshot_is_no_departures() {
        let mut state = BoardState::new();
        state.apply(1, Ok(snapshot(&[])));
        assert_eq!(
            state.view(5),
            BoardView::NoDepartures {
                last_updated: Some("08:00".to_string()),
                error: None,
            }
        );
    }

    #[test]
    fn first_failure_is_error_state() {
        let mut state = BoardState::new();
        state.apply(1, Err(status_error()));

        let view = state.view(5);
        assert!(matches!(view, BoardView::Error { .. }));
        assert!(view.error().unwrap().contains("API error 502"));
    }

    #[test]
    fn failure_after_success_keeps_departures_with_error() {
        let mut state = BoardState::new();
        state.apply(1, Ok(snapshot(&["08:05", "08:25"])));
        state.apply(2, Err(status_error()));

        let view = state.view(5);
        assert_eq!(shown_times(&view), ["08:05", "08:25"]);
        assert!(view.error().unwrap().contains("Bad Gateway"));
        assert!(matches!(state.phase(), Phase::Failed { .. }));
    }

    #[test]
    fn recovery_clears_error() {
        let mut state = BoardState::new();
        state.apply(1, Err(status_error()));
        state.apply(2, Ok(snapshot(&["09:15"])));

        let view = state.view(5);
        assert_eq!(view.error(), None);
        assert_eq!(shown_times(&view), ["09:15"]);
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut state = BoardState::new();
        assert!(state.apply(2, Ok(snapshot(&["09:15"]))));
        assert!(!state.apply(1, Ok(snapshot(&["08:05"]))));
        assert_eq!(shown_times(&state.view(5)), ["09:15"]);
    }

    #[test]
    fn stale_failure_does_not_mask_newer_success() {
        let mut state = BoardState::new();
        state.apply(3, Ok(snapshot(&["09:15"])));
        assert!(!state.apply(2, Err(status_error())));
        assert_eq!(state.view(5).error(), None);
    }

    #[test]
    fn view_serializes_with_state_tag() {
        let json = serde_json::to_value(BoardView::Loading).unwrap();
        assert_eq!(json["state"], "loading");

        let mut state = BoardState::new();
        state.apply(1, Ok(snapshot(&[])));
        let json = serde_json::to_value(state.view(5)).unwrap();
        assert_eq!(json["state"], "no_departures");
    }

    #[tokio::test]
    async fn shared_board_hands_out_increasing_sequence_numbers() {
        let board = Board::default();
        let a = board.begin_fetch();
        let b = board.begin_fetch();
        assert!(b > a);

        board.apply(b, Ok(snapshot(&["08:05"]))).await;
        assert!(!board.apply(a, Err(status_error())).await);
        assert_eq!(board.phase().await, Phase::Live);
    }

    #[tokio::test]
    async fn result_waiting_for_lock_is_dropped_once_inactive() {
        let board = Arc::new(Board::default());
        let active = Arc::new(AtomicBool::new(true));
        let seq = board.begin_fetch();

        let reader = board.state.read().await;
        let pending = tokio::spawn({
            let board = board.clone();
            let active = active.clone();
            async move {
                board
                    .apply_while(seq, Ok(snapshot(&["08:05"])), &active)
                    .await
            }
        });
        tokio::task::yield_now().await;

        active.store(false, Ordering::SeqCst);
        drop(reader);

        assert!(!pending.await.unwrap());
        assert_eq!(board.phase().await, Phase::Loading);
    }

    #[tokio::test]
    async fn apply_while_active_applies() {
        let board = Board::default();
        let active = AtomicBool::new(true);
        let seq = board.begin_fetch();
        assert!(board.apply_while(seq, Ok(snapshot(&["08:05"])), &active).await);
        assert_eq!(board.phase().await, Phase::Live);
    }
}
