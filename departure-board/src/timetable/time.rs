//! Time-of-day handling for the station timetable.
//!
//! The timetable and the departures API both speak "HH:MM" strings in the
//! station's local time. A [`TimeOfDay`] is the validated form: minutes since
//! midnight, always in `0..1440`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

/// Minutes in a day; the modulus for all rollover arithmetic.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock time of day with minute precision.
///
/// # Examples
///
/// ```
/// use departure_board::timetable::TimeOfDay;
///
/// let t = TimeOfDay::parse_hhmm("07:45").unwrap();
/// assert_eq!(t.minutes(), 7 * 60 + 45);
/// assert_eq!(t.to_string(), "07:45");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from hour and minute, returning `None` when out of range.
    pub const fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    /// Parse a time from strict "HH:MM" (24 hour) format.
    ///
    /// ```
    /// use departure_board::timetable::TimeOfDay;
    ///
    /// assert!(TimeOfDay::parse_hhmm("00:00").is_ok());
    /// assert!(TimeOfDay::parse_hhmm("23:59").is_ok());
    /// assert!(TimeOfDay::parse_hhmm("1430").is_err());
    /// assert!(TimeOfDay::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Ok(Self(hour * 60 + minute))
    }

    /// Truncate a chrono time to the minute.
    pub fn from_naive(time: NaiveTime) -> Self {
        // hour() < 24 and minute() < 60, so this stays in range
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    /// Minutes since midnight, in `0..1440`.
    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes.
fn parse_two_digits(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some((d1 * 10 + d2) as u16)
}
