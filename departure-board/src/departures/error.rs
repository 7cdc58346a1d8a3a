//! Departures client error types.

/// Errors from fetching departure data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure (connection refused, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API answered with a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not a valid snapshot
    #[error("JSON parse error: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },

    /// Mock source could not be loaded
    #[error("mock data error: {0}")]
    Mock(String),
}

impl FetchError {
    /// Transport and status failures, as opposed to a malformed body.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Status { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Parse { .. })
    }
}
