//! Station departure board.
//!
//! Polls a departures service for the next trains from Riversdale platform 1
//! and renders them as a web page, with the static timetable as a fallback
//! when live data is unavailable.

pub mod board;
pub mod config;
pub mod departures;
pub mod timetable;
pub mod web;
