use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de::Error, Deserialize, Deserializer};

use crate::errors::ItineraryError;

/// Date-time layouts accepted for timestamps that carry no UTC offset.
const FLOATING_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A scheduled arrival or departure as written in the feed.
///
/// Epoch milliseconds and RFC 3339 strings name an absolute instant, while a
/// date-time without offset is a wall-clock value read in whatever time zone
/// the itinerary is evaluated in. Either way the year is a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedInstant {
    Absolute(DateTime<Utc>),
    Floating(NaiveDateTime),
}

impl FeedInstant {
    pub fn from_millis(millis: i64) -> Result<Self, ItineraryError> {
        DateTime::from_timestamp_millis(millis)
            .map(FeedInstant::Absolute)
            .ok_or_else(|| ItineraryError::InvalidTimestamp(millis.to_string()))
    }

    /// The wall-clock date and time this instant shows in `tz`.
    pub fn wall_clock<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDateTime {
        match self {
            FeedInstant::Absolute(instant) => instant.with_timezone(tz).naive_local(),
            FeedInstant::Floating(naive) => *naive,
        }
    }
}

impl FromStr for FeedInstant {
    type Err = ItineraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(millis) = s.parse::<i64>() {
            return FeedInstant::from_millis(millis);
        }

        if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
            return Ok(FeedInstant::Absolute(instant.with_timezone(&Utc)));
        }

        FLOATING_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(FeedInstant::Floating)
            .ok_or_else(|| ItineraryError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for FeedInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedInstant::Absolute(instant) => write!(f, "{}", instant.to_rfc3339()),
            FeedInstant::Floating(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for FeedInstant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawInstant::deserialize(deserializer)? {
            RawInstant::Millis(millis) => FeedInstant::from_millis(millis).map_err(D::Error::custom),
            RawInstant::Fractional(millis) if millis.is_finite() => {
                FeedInstant::from_millis(millis.trunc() as i64).map_err(D::Error::custom)
            }
            RawInstant::Fractional(millis) => Err(D::Error::custom(format!(
                "Invalid timestamp: {millis}"
            ))),
            RawInstant::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate};

    use super::*;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_rfc3339_is_absolute() {
        let instant: FeedInstant = "2018-12-24T18:00:00Z".parse().unwrap();
        assert_eq!(
            instant,
            FeedInstant::Absolute(Utc.from_utc_datetime(&naive(2018, 12, 24, 18, 0, 0)))
        );
    }

    #[test]
    fn test_parse_without_offset_is_floating() {
        let instant: FeedInstant = "2018-12-24 18:30:00".parse().unwrap();
        assert_eq!(instant, FeedInstant::Floating(naive(2018, 12, 24, 18, 30, 0)));

        let instant: FeedInstant = "2018-12-24T18:30".parse().unwrap();
        assert_eq!(instant, FeedInstant::Floating(naive(2018, 12, 24, 18, 30, 0)));
    }

    #[test]
    fn test_parse_numeric_string_as_millis() {
        let instant: FeedInstant = "1545674400000".parse().unwrap();
        assert_eq!(
            instant,
            FeedInstant::Absolute(Utc.from_utc_datetime(&naive(2018, 12, 24, 18, 0, 0)))
        );
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!("christmas eve".parse::<FeedInstant>().is_err());
        assert!("".parse::<FeedInstant>().is_err());
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: FeedInstant = serde_json::from_str("1545674400000").unwrap();
        let from_string: FeedInstant = serde_json::from_str("\"2018-12-24T18:00:00Z\"").unwrap();
        assert_eq!(from_number, from_string);

        let fractional: FeedInstant = serde_json::from_str("1545674400000.7").unwrap();
        assert_eq!(fractional, from_number);
    }

    #[test]
    fn test_wall_clock_follows_time_zone() {
        let instant: FeedInstant = "2018-12-24T18:00:00Z".parse().unwrap();
        let minus_three = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            instant.wall_clock(&minus_three),
            naive(2018, 12, 24, 15, 0, 0)
        );

        let floating = FeedInstant::Floating(naive(2018, 12, 24, 18, 0, 0));
        assert_eq!(floating.wall_clock(&minus_three), naive(2018, 12, 24, 18, 0, 0));
    }
}
