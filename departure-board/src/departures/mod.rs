//! Departures API client.
//!
//! The departures service publishes the station's upcoming trains as a
//! single JSON snapshot:
//! - Times are "HH:MM" strings in station-local time
//! - `live_time` is the real-time estimate and overrides `scheduled_time`
//!   for display when present
//! - The snapshot is replaced wholesale on each fetch

mod client;
mod error;
pub mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, DeparturesClient, DeparturesConfig, DeparturesSource};
pub use error::FetchError;
pub use types::{Departure, Disruption, Snapshot};
