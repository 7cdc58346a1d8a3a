//! Departures API HTTP client.
//!
//! Talks to the station's departures service, which exposes the current
//! board as a JSON snapshot plus a liveness endpoint.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::FetchError;
use super::types::Snapshot;

/// Default base URL: a departures service on the development machine.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Anything that can produce departure snapshots.
///
/// The poller and the web layer are generic over this so they can run
/// against the real API, a file-backed mock, or a scripted test double.
pub trait DeparturesSource: Send + Sync + 'static {
    /// Fetch the current board.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send;

    /// Whether the upstream service is alive.
    fn check_health(&self) -> impl Future<Output = bool> + Send;
}

/// Configuration for the departures client.
#[derive(Debug, Clone)]
pub struct DeparturesConfig {
    /// Base URL of the departures service, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DeparturesConfig {
    /// Create a config pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DeparturesConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// HTTP client for the departures service.
#[derive(Debug, Clone)]
pub struct DeparturesClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeparturesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DeparturesConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// GET `/api/departures` and parse the snapshot.
    pub async fn get_departures(&self) -> Result<Snapshot, FetchError> {
        let url = format!("{}/api/departures", self.base_url);
        debug!(%url, "fetching departures");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("no response body").to_string(),
                text => text.chars().take(200).collect(),
            };
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetchError::Parse {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// GET `/api/health`; any 2xx counts as healthy.
    pub async fn get_health(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);

        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "health check request failed");
                false
            }
        }
    }
}

impl DeparturesSource for DeparturesClient {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send {
        self.get_departures()
    }

    fn check_health(&self) -> impl Future<Output = bool> + Send {
        self.get_health()
    }
}
