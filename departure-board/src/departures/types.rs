//! Wire types for the departures API.
//!
//! The upstream service already flattens the transit authority's response
//! into a board-shaped snapshot, so these double as domain types.

use serde::{Deserialize, Serialize};

/// One departure from the station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// Timetabled departure, "HH:MM".
    pub scheduled_time: String,

    /// Real-time estimate, if the train is being tracked.
    #[serde(default)]
    pub live_time: Option<String>,

    pub destination: String,

    #[serde(default)]
    pub platform: Option<String>,

    /// Train is standing at the platform now.
    #[serde(default)]
    pub at_platform: bool,

    /// Vehicle description, e.g. "3 Car Comeng".
    #[serde(default)]
    pub vehicle: Option<String>,

    #[serde(default)]
    pub direction: Option<String>,

    #[serde(default)]
    pub disruptions: Vec<Disruption>,

    #[serde(default)]
    pub route_name: Option<String>,
}

impl Departure {
    /// Create a departure with only the core fields set.
    pub fn new(scheduled_time: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            scheduled_time: scheduled_time.into(),
            live_time: None,
            destination: destination.into(),
            platform: None,
            at_platform: false,
            vehicle: None,
            direction: None,
            disruptions: Vec::new(),
            route_name: None,
        }
    }

    /// Set the live estimate.
    pub fn with_live_time(mut self, live_time: impl Into<String>) -> Self {
        self.live_time = Some(live_time.into());
        self
    }

    /// The time to display (live if available, else scheduled).
    pub fn display_time(&self) -> &str {
        self.live_time.as_deref().unwrap_or(&self.scheduled_time)
    }

    /// Whether the live estimate differs from the timetable.
    pub fn is_delayed(&self) -> bool {
        self.live_time
            .as_ref()
            .is_some_and(|live| live != &self.scheduled_time)
    }

    pub fn is_disrupted(&self) -> bool {
        !self.disruptions.is_empty()
    }
}

/// A service disruption notice attached to a departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disruption {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A whole departures response.
///
/// Replaced wholesale on every successful fetch; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Departures in the order the API returned them.
    pub departures: Vec<Departure>,

    /// When the upstream last refreshed its data, station-local "HH:MM".
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<String>,

    /// Upstream is mid-refresh.
    #[serde(default)]
    pub updating: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "departures": [
            {
                "scheduled_time": "08:05",
                "live_time": "08:07",
                "destination": "Flinders Street",
                "platform": "1",
                "at_platform": true,
                "vehicle": "6 Car X'Trapolis",
                "direction": "City",
                "disruptions": [{"title": "Works", "description": "Buses replace trains"}],
                "route_name": "Alamein"
            },
            {
                "scheduled_time": "08:25",
                "live_time": null,
                "destination": "Flinders Street"
            }
        ],
        "lastUpdated": "08:01",
        "updating": false
    }"#;

    #[test]
    fn parse_full_snapshot() {
        let snapshot: Snapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snapshot.departures.len(), 2);
        assert_eq!(snapshot.last_updated.as_deref(), Some("08:01"));
        assert!(!snapshot.updating);

        let first = &snapshot.departures[0];
        assert_eq!(first.route_name.as_deref(), Some("Alamein"));
        assert!(first.at_platform);
        assert_eq!(first.disruptions[0].title, "Works");
    }

    #[test]
    fn extended_fields_are_optional() {
        let snapshot: Snapshot = serde_json::from_str(SAMPLE).unwrap();
        let second = &snapshot.departures[1];
        assert_eq!(second.live_time, None);
        assert_eq!(second.platform, None);
        assert!(!second.at_platform);
        assert!(second.disruptions.is_empty());
    }

    #[test]
    fn last_updated_and_updating_default() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"departures": []}"#).unwrap();
        assert_eq!(snapshot.last_updated, None);
        assert!(!snapshot.updating);
    }

    #[test]
    fn missing_departures_is_an_error() {
        assert!(serde_json::from_str::<Snapshot>(r#"{"lastUpdated": null}"#).is_err());
    }

    #[test]
    fn live_time_overrides_scheduled() {
        let on_time = Departure::new("08:05", "Flinders Street");
        assert_eq!(on_time.display_time(), "08:05");
        assert!(!on_time.is_delayed());

        let late = on_time.clone().with_live_time("08:09");
        assert_eq!(late.display_time(), "08:09");
        assert!(late.is_delayed());

        let tracked = on_time.with_live_time("08:05");
        assert!(!tracked.is_delayed());
    }

    #[test]
    fn serializes_last_updated_in_camel_case() {
        let snapshot = Snapshot {
            departures: vec![],
            last_updated: Some("09:00".into()),
            updating: true,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["lastUpdated"], "09:00");
        assert_eq!(json["updating"], true);
    }
}
