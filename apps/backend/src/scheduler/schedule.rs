//! Weekly wall-clock schedules in UTC.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use time::{Duration, OffsetDateTime, Time, UtcOffset, Weekday};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("expected '<weekday> <HH:MM>', got '{0}'")]
    Format(String),
    #[error("unknown weekday '{0}'")]
    Weekday(String),
    #[error("invalid time of day '{0}' (expected HH:MM)")]
    Time(String),
}

/// Fires once a week at `time` (UTC) on `weekday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule {
    weekday: Weekday,
    time: Time,
}

impl WeeklySchedule {
    pub fn new(weekday: Weekday, time: Time) -> Self {
        Self { weekday, time }
    }

    pub(crate) fn saturday(hour: u8, minute: u8) -> Self {
        Self::new(Weekday::Saturday, Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT))
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn time(&self) -> Time {
        self.time
    }

    /// Next fire time strictly after `now`; always within the following 7 days.
    pub fn next_after(&self, now: OffsetDateTime) -> OffsetDateTime {
        let now = now.to_offset(UtcOffset::UTC);
        let ahead = (i64::from(self.weekday.number_days_from_monday())
            - i64::from(now.weekday().number_days_from_monday()))
        .rem_euclid(7);
        let candidate = (now.date() + Duration::days(ahead))
            .with_time(self.time)
            .assume_utc();
        if candidate > now {
            candidate
        } else {
            candidate + Duration::weeks(1)
        }
    }
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    let day = match s.to_ascii_lowercase().as_str() {
        "mon" | "monday" => Weekday::Monday,
        "tue" | "tues" | "tuesday" => Weekday::Tuesday,
        "wed" | "wednesday" => Weekday::Wednesday,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thursday,
        "fri" | "friday" => Weekday::Friday,
        "sat" | "saturday" => Weekday::Saturday,
        "sun" | "sunday" => Weekday::Sunday,
        _ => return None,
    };
    Some(day)
}

fn parse_time(s: &str) -> Option<Time> {
    let (h, m) = s.split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    Time::from_hms(h.parse().ok()?, m.parse().ok()?, 0).ok()
}

impl FromStr for WeeklySchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(day), Some(time), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ScheduleError::Format(s.to_string()));
        };
        let weekday = parse_weekday(day).ok_or_else(|| ScheduleError::Weekday(day.to_string()))?;
        let time = parse_time(time).ok_or_else(|| ScheduleError::Time(time.to_string()))?;
        Ok(Self::new(weekday, time))
    }
}

impl fmt::Display for WeeklySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = match self.weekday {
            Weekday::Monday => "mon",
            Weekday::Tuesday => "tue",
            Weekday::Wednesday => "wed",
            Weekday::Thursday => "thu",
            Weekday::Friday => "fri",
            Weekday::Saturday => "sat",
            Weekday::Sunday => "sun",
        };
        write!(f, "{day} {:02}:{:02}", self.time.hour(), self.time.minute())
    }
}
