//! Next-departure selection against a daily timetable.

use serde::Serialize;

use super::time::{MINUTES_PER_DAY, TimeOfDay};

/// The next scheduled train and how long until it leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextTrain {
    #[serde(serialize_with = "serialize_time")]
    pub time: TimeOfDay,
    /// Always in `0..1440`; zero means departing now.
    pub minutes_until: u16,
}

impl NextTrain {
    /// Human readable wait, e.g. "1 hour 15 minutes".
    pub fn wait_text(&self) -> String {
        format_minutes(self.minutes_until)
    }
}

fn serialize_time<S: serde::Serializer>(t: &TimeOfDay, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(t)
}

/// Minutes from `now` until `target`, wrapping past midnight.
///
/// ```
/// use departure_board::timetable::{TimeOfDay, minutes_until};
///
/// let t = |s| TimeOfDay::parse_hhmm(s).unwrap();
/// assert_eq!(minutes_until(t("00:00"), t("23:59")), 1);
/// assert_eq!(minutes_until(t("08:30"), t("08:00")), 30);
/// ```
pub fn minutes_until(target: TimeOfDay, now: TimeOfDay) -> u16 {
    let diff = target.minutes() as i32 - now.minutes() as i32;
    diff.rem_euclid(MINUTES_PER_DAY as i32) as u16
}

/// First entry of `times` strictly after `now`, or `times[0]` tomorrow.
///
/// `times` must be one day's departures in ascending order. Returns `None`
/// only for an empty timetable.
pub fn next_departure(times: &[TimeOfDay], now: TimeOfDay) -> Option<NextTrain> {
    let time = times
        .iter()
        .copied()
        .find(|t| *t > now)
        .or_else(|| times.first().copied())?;

    Some(NextTrain {
        time,
        minutes_until: minutes_until(time, now),
    })
}

/// Render a wait in minutes.
///
/// Waits of an hour or more show both components, each pluralised on its
/// own: `"1 hour 0 minutes"`, `"2 hours 1 minute"`.
pub fn format_minutes(minutes: u16) -> String {
    if minutes >= 60 {
        let hours = minutes / 60;
        let mins = minutes % 60;
        format!("{} {}", unit(hours, "hour"), unit(mins, "minute"))
    } else {
        unit(minutes, "minute")
    }
}

fn unit(n: u16, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
