//! Data transfer objects for JSON responses.

use serde::Serialize;

use crate::board::BoardView;
use crate::timetable::NextTrain;

/// Response for `GET /api/board`.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// Live board
    pub board: BoardView,

    /// Next train from the static timetable
    pub next_scheduled: Option<NextScheduled>,
}

/// Timetable fallback in a JSON response.
#[derive(Debug, Serialize)]
pub struct NextScheduled {
    #[serde(flatten)]
    pub next: NextTrain,

    /// Wait rendered for display, e.g. "1 hour 15 minutes"
    pub wait: String,
}

impl NextScheduled {
    pub fn from_next(next: NextTrain) -> Self {
        Self {
            wait: next.wait_text(),
            next,
        }
    }
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Response for `POST /retry` from non-browser clients.
#[derive(Debug, Serialize)]
pub struct RetryResponse {
    pub status: &'static str,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::TimeOfDay;

    #[test]
    fn next_scheduled_flattens_train() {
        let next = NextTrain {
            time: TimeOfDay::parse_hhmm("05:10").unwrap(),
            minutes_until: 75,
        };
        let json = serde_json::to_value(NextScheduled::from_next(next)).unwrap();
        assert_eq!(json["time"], "05:10");
        assert_eq!(json["minutes_until"], 75);
        assert_eq!(json["wait"], "1 hour 15 minutes");
    }

    #[test]
    fn board_response_shape() {
        let response = BoardResponse {
            board: BoardView::Loading,
            next_scheduled: None,
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["board"]["state"], "loading");
        assert!(json["next_scheduled"].is_null());
    }
}
