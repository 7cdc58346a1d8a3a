//! Wall-clock sources.
//!
//! The station's published timetable is in its own timezone, so the clock is
//! always read in a named zone rather than the host's local one.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::time::TimeOfDay;

/// Source of the current time of day at the station.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimeOfDay;
}

/// System clock converted into a fixed IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Station-local time of day for an arbitrary instant.
    pub fn time_at(&self, instant: DateTime<Utc>) -> TimeOfDay {
        TimeOfDay::from_naive(instant.with_timezone(&self.tz).time())
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> TimeOfDay {
        self.time_at(Utc::now())
    }
}

/// A clock stuck at one time. Used in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub TimeOfDay);

impl Clock for FixedClock {
    fn now(&self) -> TimeOfDay {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Australia::Melbourne;

    #[test]
    fn zoned_clock_ignores_host_timezone() {
        let clock = ZonedClock::new(Melbourne);
        assert_eq!(clock.timezone(), Melbourne);
        // 2026-01-15 is AEDT (UTC+11)
        let instant = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 0).unwrap();
        assert_eq!(clock.time_at(instant).to_string(), "23:30");
    }

    #[test]
    fn zoned_clock_tracks_daylight_saving() {
        let clock = ZonedClock::new(Melbourne);
        // 2026-07-15 is AEST (UTC+10)
        let instant = Utc.with_ymd_and_hms(2026, 7, 15, 12, 30, 0).unwrap();
        assert_eq!(clock.time_at(instant).to_string(), "22:30");
    }

    #[test]
    fn fixed_clock_returns_its_time() {
        let t = TimeOfDay::parse_hhmm("08:05").unwrap();
        assert_eq!(FixedClock(t).now(), t);
    }
}
