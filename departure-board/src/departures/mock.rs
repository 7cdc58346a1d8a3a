//! Mock departure sources for running without the departures service.
//!
//! [`FileSource`] serves a snapshot from a JSON file on disk, re-reading it
//! on every fetch so it can be edited while the board is running.
//! [`ScriptedSource`] plays back a fixed sequence of outcomes and counts
//! calls, for exercising the poller and the web layer.

use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::client::DeparturesSource;
use super::error::FetchError;
use super::types::Snapshot;

/// Serves the snapshot stored in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source backed by `path`.
    ///
    /// Fails fast if the file is missing or does not hold a snapshot.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| read_error(&path, e))?;
        parse_snapshot(json)?;
        Ok(Self { path })
    }
}

fn read_error(path: &Path, e: std::io::Error) -> FetchError {
    FetchError::Mock(format!("failed to read {:?}: {}", path, e))
}

fn parse_snapshot(json: String) -> Result<Snapshot, FetchError> {
    serde_json::from_str(&json).map_err(|e| FetchError::Parse {
        message: e.to_string(),
        body: Some(json.chars().take(500).collect()),
    })
}

impl DeparturesSource for FileSource {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send {
        let path = self.path.clone();
        async move {
            let json = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| read_error(&path, e))?;
            parse_snapshot(json)
        }
    }

    fn check_health(&self) -> impl Future<Output = bool> + Send {
        let path = self.path.clone();
        async move {
            tokio::fs::metadata(&path)
                .await
                .is_ok_and(|meta| meta.is_file())
        }
    }
}

/// One scripted fetch outcome.
#[derive(Debug, Clone)]
pub enum Outcome {
    Snapshot(Snapshot),
    Status(u16),
    Malformed,
}

impl Outcome {
    fn into_result(self) -> Result<Snapshot, FetchError> {
        match self {
            Outcome::Snapshot(s) => Ok(s),
            Outcome::Status(status) => Err(FetchError::Status {
                status,
                message: "scripted failure".to_string(),
            }),
            Outcome::Malformed => Err(FetchError::Parse {
                message: "expected value at line 1 column 1".to_string(),
                body: None,
            }),
        }
    }
}

/// Plays back outcomes in order; the last one repeats once the script runs out.
#[derive(Debug)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<(Outcome, Duration)>>,
    last: Mutex<Option<Outcome>>,
    calls: AtomicUsize,
    healthy: bool,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            healthy: true,
        }
    }

    /// Queue an outcome returned immediately.
    pub fn then(self, outcome: Outcome) -> Self {
        self.then_after(outcome, Duration::ZERO)
    }

    /// Queue an outcome returned after `delay`.
    pub fn then_after(self, outcome: Outcome, delay: Duration) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back((outcome, delay));
        }
        self
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> (Outcome, Duration) {
        let queued = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match queued {
            Some((outcome, delay)) => {
                *last = Some(outcome.clone());
                (outcome, delay)
            }
            None => (
                last.clone().unwrap_or(Outcome::Snapshot(Snapshot::default())),
                Duration::ZERO,
            ),
        }
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DeparturesSource for ScriptedSource {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (outcome, delay) = self.next_outcome();
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome.into_result()
        }
    }

    fn check_health(&self) -> impl Future<Output = bool> + Send {
        let healthy = self.healthy;
        async move { healthy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::departures::Departure;
    use std::io::Write;

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

    #[tokio::test]
    async fn file_source_serves_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"departures":[{{"scheduled_time":"07:45","destination":"Flinders Street"}}]}}"#
        )
        .unwrap();

        let source = FileSource::new(file.path()).unwrap();
        let snapshot = source.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.departures[0].scheduled_time, "07:45");
        assert!(source.check_health().await);
    }

    #[tokio::test]
    async fn file_source_rereads_on_each_fetch() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"departures":[]}"#).unwrap();
        let source = FileSource::new(file.path()).unwrap();
        assert!(source.fetch_snapshot().await.unwrap().departures.is_empty());

        std::fs::write(
            file.path(),
            r#"{"departures":[{"scheduled_time":"09:15","destination":"Camberwell"}]}"#,
        )
        .unwrap();
        assert_eq!(source.fetch_snapshot().await.unwrap().departures.len(), 1);
    }

    #[tokio::test]
    async fn bundled_sample_loads() {
        let source = FileSource::new("data/departures.json").unwrap();
        let snapshot = source.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.departures.len(), 3);
        assert!(snapshot.departures[1].is_disrupted());
    }

    #[tokio::test]
    async fn file_source_reports_removed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, r#"{"departures":[]}"#).unwrap();
        let source = FileSource::new(&path).unwrap();

        std::fs::remove_file(&path).unwrap();
        assert!(!source.check_health().await);
        assert!(matches!(
            source.fetch_snapshot().await.unwrap_err(),
            FetchError::Mock(_)
        ));
    }

    #[test]
    fn file_source_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, FetchError::Mock(_)));
    }

    #[test]
    fn file_source_rejects_bad_json() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "not json").unwrap();
        assert!(FileSource::new(file.path()).unwrap_err().is_parse());
    }

    #[tokio::test]
    async fn scripted_source_plays_in_order_then_repeats() {
        let source = ScriptedSource::new()
            .then(Outcome::Snapshot(snapshot(&["08:05"])))
            .then(Outcome::Status(502));

        assert!(source.fetch_snapshot().await.is_ok());
        assert!(source.fetch_snapshot().await.unwrap_err().is_network());
        assert!(source.fetch_snapshot().await.unwrap_err().is_network());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn scripted_source_malformed_is_parse_error() {
        let source = ScriptedSource::new().then(Outcome::Malformed);
        assert!(source.fetch_snapshot().await.unwrap_err().is_parse());
    }
}
