//! Background polling of the departures source.
//!
//! [`Poller::start`] fetches once immediately, then on every interval tick,
//! and whenever [`PollerHandle::retry`] is called. Each fetch runs as its own
//! task so a slow response never delays the next tick; the board sorts out
//! ordering by sequence number.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::departures::DeparturesSource;

use super::state::Board;

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest polling interval accepted; shorter ones are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Starts polling tasks.
pub struct Poller;

impl Poller {
    /// Start polling `source` into `board` every `interval`.
    ///
    /// Polling runs until the returned handle is stopped or dropped.
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn start<S: DeparturesSource>(
        source: Arc<S>,
        board: Arc<Board>,
        interval: Duration,
    ) -> PollerHandle {
        if interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                "poll interval too short, using minimum"
            );
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let retry = Arc::new(Notify::new());
        let active = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(run(source, board, interval, retry.clone(), active.clone()));
        info!(interval_secs = interval.as_secs(), "departure polling started");

        PollerHandle {
            task,
            retry,
            active,
        }
    }
}

async fn run<S: DeparturesSource>(
    source: Arc<S>,
    board: Arc<Board>,
    interval: Duration,
    retry: Arc<Notify>,
    active: Arc<AtomicBool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => debug!("scheduled refresh"),
            _ = retry.notified() => info!("manual retry requested"),
        }
        spawn_fetch(source.clone(), board.clone(), active.clone());
    }
}

fn spawn_fetch<S: DeparturesSource>(source: Arc<S>, board: Arc<Board>, active: Arc<AtomicBool>) {
    let seq = board.begin_fetch();
    tokio::spawn(async move {
        let result = source.fetch_snapshot().await;
        // In-flight fetches are not cancelled on teardown; their results are dropped.
        board.apply_while(seq, result, &active).await;
    });
}

/// Owns the polling task. Stopping or dropping it ends polling.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
    retry: Arc<Notify>,
    active: Arc<AtomicBool>,
}

impl PollerHandle {
    /// Fetch now instead of waiting for the next tick.
    pub fn retry(&self) {
        if self.is_active() {
            self.retry.notify_one();
        }
    }

    /// Stop polling. Fetches already in flight are ignored when they land.
    pub fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.task.abort();
            info!("departure polling stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
