//! Web layer for the departure board.
//!
//! Renders the live board and timetable as HTML, and exposes the same data
//! as JSON plus retry and health endpoints.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
