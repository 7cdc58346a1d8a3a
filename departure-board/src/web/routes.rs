//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::departures::DeparturesSource;
use crate::timetable::{CITY_BOUND, next_city_bound};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router<S: DeparturesSource>(state: AppState<S>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(board_page::<S>))
        .route("/timetable", get(timetable_page::<S>))
        .route("/api/board", get(board_json::<S>))
        .route("/retry", post(retry::<S>))
        .route("/health", get(health::<S>))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Upstream liveness, for external health checkers.
async fn health<S: DeparturesSource>(State(state): State<AppState<S>>) -> Response {
    if state.source.check_health().await {
        Json(HealthResponse { status: "healthy" }).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
            }),
        )
            .into_response()
    }
}

/// Live board with the timetable fallback.
async fn board_page<S: DeparturesSource>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, AppError> {
    let view = state.board.view().await;
    let next = next_city_bound(state.clock.as_ref());

    let template = BoardTemplate {
        board: BoardPageView::from_view(&view),
        next_train: next.as_ref().map(NextTrainView::from_next),
    };
    render(&template)
}

/// Static timetable with the next train highlighted.
async fn timetable_page<S: DeparturesSource>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, AppError> {
    let next = next_city_bound(state.clock.as_ref());

    let template = TimetableTemplate {
        rows: TimetableRow::build(&CITY_BOUND, next.as_ref()),
        next_train: next.as_ref().map(NextTrainView::from_next),
    };
    render(&template)
}

/// Board as JSON.
async fn board_json<S: DeparturesSource>(State(state): State<AppState<S>>) -> Json<BoardResponse> {
    let board = state.board.view().await;
    let next_scheduled = next_city_bound(state.clock.as_ref()).map(NextScheduled::from_next);

    Json(BoardResponse {
        board,
        next_scheduled,
    })
}

/// Fetch now; browsers are sent back to the board.
async fn retry<S: DeparturesSource>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Response {
    state.poller.retry();

    if accepts_html(&headers) {
        Redirect::to("/").into_response()
    } else {
        (
            StatusCode::ACCEPTED,
            Json(RetryResponse { status: "retrying" }),
        )
            .into_response()
    }
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
