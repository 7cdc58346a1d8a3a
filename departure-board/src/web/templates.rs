//! Askama templates for the board pages.

use askama::Template;

use crate::board::BoardView;
use crate::departures::Departure;
use crate::timetable::{NextTrain, TimeOfDay};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Live board with the timetable fallback underneath.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub board: BoardPageView,
    pub next_train: Option<NextTrainView>,
}

/// Full static timetable.
#[derive(Template)]
#[template(path = "timetable.html")]
pub struct TimetableTemplate {
    pub rows: Vec<TimetableRow>,
    pub next_train: Option<NextTrainView>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Flattened board state for the template.
#[derive(Debug, Clone)]
pub struct BoardPageView {
    pub is_loading: bool,
    /// Held snapshot lists no trains.
    pub is_empty: bool,
    pub error: Option<String>,
    pub departures: Vec<DepartureView>,
    pub last_updated: Option<String>,
    pub updating: bool,
}

impl BoardPageView {
    pub fn from_view(view: &BoardView) -> Self {
        let mut page = Self {
            is_loading: false,
            is_empty: false,
            error: view.error().map(str::to_string),
            departures: Vec::new(),
            last_updated: None,
            updating: false,
        };

        match view {
            BoardView::Loading => page.is_loading = true,
            BoardView::Departures {
                departures,
                last_updated,
                updating,
                ..
            } => {
                page.departures = departures.iter().map(DepartureView::from_departure).collect();
                page.last_updated = last_updated.clone();
                page.updating = *updating;
            }
            BoardView::NoDepartures { last_updated, .. } => {
                page.is_empty = true;
                page.last_updated = last_updated.clone();
            }
            BoardView::Error { .. } => {}
        }

        page
    }
}

/// One row of the live board.
#[derive(Debug, Clone)]
pub struct DepartureView {
    pub display_time: String,
    pub scheduled_time: String,
    pub is_delayed: bool,
    pub destination: String,
    pub platform: Option<String>,
    pub at_platform: bool,
    pub vehicle: Option<String>,
    /// Disruption titles joined for display; empty when undisrupted.
    pub disruptions: String,
}

impl DepartureView {
    pub fn from_departure(dep: &Departure) -> Self {
        let disruptions = dep
            .disruptions
            .iter()
            .map(|d| d.title.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            display_time: dep.display_time().to_string(),
            scheduled_time: dep.scheduled_time.clone(),
            is_delayed: dep.is_delayed(),
            destination: dep.destination.clone(),
            platform: dep.platform.clone(),
            at_platform: dep.at_platform,
            vehicle: dep.vehicle.clone(),
            disruptions: if disruptions.is_empty() && dep.is_disrupted() {
                "Disruption".to_string()
            } else {
                disruptions
            },
        }
    }
}

/// The next scheduled train, ready to print.
#[derive(Debug, Clone)]
pub struct NextTrainView {
    pub time: String,
    pub wait: String,
    pub departing_now: bool,
}

impl NextTrainView {
    pub fn from_next(next: &NextTrain) -> Self {
        Self {
            time: next.time.to_string(),
            wait: next.wait_text(),
            departing_now: next.minutes_until == 0,
        }
    }
}

/// One row of the static timetable.
#[derive(Debug, Clone)]
pub struct TimetableRow {
    pub time: String,
    pub is_next: bool,
}

impl TimetableRow {
    pub fn build(times: &[TimeOfDay], next: Option<&NextTrain>) -> Vec<Self> {
        times
            .iter()
            .map(|t| TimetableRow {
                time: t.to_string(),
                is_next: next.is_some_and(|n| n.time == *t),
            })
            .collect()
    }
}
