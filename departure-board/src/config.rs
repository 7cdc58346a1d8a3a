//! Board configuration.
//!
//! Everything is read from the environment with development defaults, so
//! `cargo run` against a local departures service needs no setup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::board::{DEFAULT_DISPLAY_LIMIT, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
use crate::departures::{DEFAULT_BASE_URL, DeparturesConfig};

/// Timezone the station's timetable is published in.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Australia::Melbourne;

/// Default listen address for the board's web server.
const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be a positive whole number, got {value}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} is not a known IANA timezone: {value}")]
    InvalidTimezone { var: &'static str, value: String },
}

/// Configuration for the whole board.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Departures service client settings
    pub departures: DeparturesConfig,
    /// Serve departures from this JSON file instead of the API
    pub mock_file: Option<PathBuf>,
    /// How often to poll for departures
    pub poll_interval: Duration,
    /// How many departures to show
    pub display_limit: usize,
    /// Station timezone for the timetable clock
    pub timezone: Tz,
    /// Where the web server listens
    pub listen_addr: SocketAddr,
    /// Directory of static assets
    pub static_dir: PathBuf,
}

impl BoardConfig {
    /// Create a config polling the departures service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            departures: DeparturesConfig::new(base_url),
            mock_file: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            timezone: DEFAULT_TIMEZONE,
            listen_addr: SocketAddr::from(DEFAULT_ADDR),
            static_dir: PathBuf::from("static"),
        }
    }

    /// Set the polling interval, raised to [`MIN_POLL_INTERVAL`] if shorter.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Serve a snapshot file instead of calling the API.
    pub fn with_mock_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mock_file = Some(path.into());
        self
    }

    /// Set the station timezone.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Read configuration from process environment variables.
    ///
    /// | Variable                  | Default                 |
    /// |---------------------------|-------------------------|
    /// | `DEPARTURES_API_URL`      | `http://localhost:5000` |
    /// | `DEPARTURES_TIMEOUT_SECS` | `10`                    |
    /// | `DEPARTURES_POLL_SECS`    | `60`                    |
    /// | `DEPARTURES_MOCK_FILE`    | unset                   |
    /// | `STATION_TIMEZONE`        | `Australia/Melbourne`   |
    /// | `BOARD_ADDR`              | `127.0.0.1:3000`        |
    /// | `BOARD_STATIC_DIR`        | `static`                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let base_url = get("DEPARTURES_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Some(value) = get("DEPARTURES_TIMEOUT_SECS") {
            config.departures = config
                .departures
                .with_timeout(parse_secs("DEPARTURES_TIMEOUT_SECS", &value)?);
        }

        if let Some(value) = get("DEPARTURES_POLL_SECS") {
            let secs = parse_secs("DEPARTURES_POLL_SECS", &value)?;
            config.poll_interval = Duration::from_secs(secs);
        }

        if let Some(path) = get("DEPARTURES_MOCK_FILE") {
            config.mock_file = Some(PathBuf::from(path));
        }

        if let Some(value) = get("STATION_TIMEZONE") {
            config.timezone = value
                .parse()
                .map_err(|_| ConfigError::InvalidTimezone {
                    var: "STATION_TIMEZONE",
                    value,
                })?;
        }

        if let Some(value) = get("BOARD_ADDR") {
            config.listen_addr = value.parse().map_err(|_| ConfigError::InvalidAddr {
                var: "BOARD_ADDR",
                value,
            })?;
        }

        if let Some(dir) = get("BOARD_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn parse_secs(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
