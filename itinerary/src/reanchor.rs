use std::fmt;

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone,
};

use crate::errors::ItineraryError;

/// A month, day and wall-clock time with no year attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfYear {
    pub month: u32,
    pub day: u32,
    pub time: NaiveTime,
}

impl TimeOfYear {
    pub fn new(month: u32, day: u32, time: NaiveTime) -> Self {
        Self { month, day, time }
    }

    /// Drops the year of a wall-clock date-time.
    pub fn of(naive: &NaiveDateTime) -> Self {
        Self {
            month: naive.month(),
            day: naive.day(),
            time: naive.time(),
        }
    }

    /// The wall-clock date-time on `year`.
    ///
    /// Days past the end of the month roll into the next one, so Feb 29
    /// becomes Mar 1 on a non-leap year.
    pub fn on_year(&self, year: i32) -> Option<NaiveDateTime> {
        let first = NaiveDate::from_ymd_opt(year, self.month, 1)?;
        let date = first.checked_add_days(Days::new(u64::from(self.day.saturating_sub(1))))?;
        Some(date.and_time(self.time))
    }
}

impl fmt::Display for TimeOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02} {}", self.month, self.day, self.time)
    }
}

/// Places a year-less schedule entry on `year` in the time zone `tz`.
///
/// An ambiguous local time resolves to its earliest instant. A local time
/// skipped by a daylight-saving jump is moved one hour forward.
pub fn reanchor<Tz: TimeZone>(
    time_of_year: TimeOfYear,
    year: i32,
    tz: &Tz,
) -> Result<DateTime<Tz>, ItineraryError> {
    let naive = time_of_year
        .on_year(year)
        .ok_or_else(|| ItineraryError::Reanchor(time_of_year.to_string(), year))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Ok(instant),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .ok_or_else(|| ItineraryError::Reanchor(time_of_year.to_string(), year)),
    }
}
