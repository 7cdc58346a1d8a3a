//! Static timetable fallback.
//!
//! When live data is unavailable the board still shows the next train from
//! the station's published weekday timetable. Everything here is pure: the
//! only input that changes is the [`Clock`].

mod clock;
mod next;
mod time;

pub use clock::{Clock, FixedClock, ZonedClock};
pub use next::{NextTrain, format_minutes, minutes_until, next_departure};
pub use time::{MINUTES_PER_DAY, TimeError, TimeOfDay};

const fn at(hour: u16, minute: u16) -> TimeOfDay {
    match TimeOfDay::from_hm(hour, minute) {
        Some(t) => t,
        None => panic!("timetable entry out of range"),
    }
}

/// City-bound departures from Riversdale platform 1, in ascending order.
pub const CITY_BOUND: [TimeOfDay; 20] = [
    at(5, 10),
    at(5, 40),
    at(6, 10),
    at(6, 40),
    at(7, 5),
    at(7, 25),
    at(7, 45),
    at(8, 5),
    at(8, 25),
    at(8, 45),
    at(9, 15),
    at(9, 45),
    at(10, 45),
    at(12, 15),
    at(13, 45),
    at(15, 15),
    at(16, 45),
    at(18, 15),
    at(19, 45),
    at(21, 15),
];

/// Next city-bound train according to the clock.
pub fn next_city_bound(clock: &dyn Clock) -> Option<NextTrain> {
    next_departure(&CITY_BOUND, clock.now())
}
