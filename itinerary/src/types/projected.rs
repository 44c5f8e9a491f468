use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::Location;

/// Where the tour stands relative to one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Upcoming,
    Present,
    Departed,
}

impl Presence {
    /// Departed takes precedence over present, present over upcoming.
    pub fn from_flags(is_present: bool, has_departed: bool) -> Self {
        if has_departed {
            Presence::Departed
        } else if is_present {
            Presence::Present
        } else {
            Presence::Upcoming
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Presence::Upcoming => "upcoming",
            Presence::Present => "present",
            Presence::Departed => "departed",
        }
    }
}

/// A destination with its schedule moved onto the evaluation year and its
/// status relative to the evaluation instant.
///
/// This is what the rendering layer consumes; it serializes with the
/// schedule as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedDestination {
    pub id: String,
    pub location: Location,
    pub city: String,
    pub region: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub arrival: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub departure: DateTime<Utc>,
    pub is_present: bool,
    pub has_departed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectedDestination {
    pub fn presence(&self) -> Presence {
        Presence::from_flags(self.is_present, self.has_departed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_presence_precedence() {
        assert_eq!(Presence::from_flags(false, false), Presence::Upcoming);
        assert_eq!(Presence::from_flags(true, false), Presence::Present);
        assert_eq!(Presence::from_flags(false, true), Presence::Departed);
        assert_eq!(Presence::from_flags(true, true), Presence::Departed);
    }

    #[test]
    fn test_serializes_rendering_fields() {
        let mut extra = Map::new();
        extra.insert("population".to_string(), Value::from(3_000_000));

        let destination = ProjectedDestination {
            id: "ba".to_string(),
            location: Location::new(-34.6, -58.4),
            city: "Buenos Aires".to_string(),
            region: "Argentina".to_string(),
            arrival: Utc.timestamp_millis_opt(1_000).unwrap(),
            departure: Utc.timestamp_millis_opt(2_000).unwrap(),
            is_present: true,
            has_departed: false,
            extra,
        };

        let json = serde_json::to_value(&destination).unwrap();

        assert_eq!(json["arrival"], Value::from(1_000));
        assert_eq!(json["departure"], Value::from(2_000));
        assert_eq!(json["isPresent"], Value::from(true));
        assert_eq!(json["hasDeparted"], Value::from(false));
        assert_eq!(json["location"]["lng"], Value::from(-58.4));
        assert_eq!(json["population"], Value::from(3_000_000));
    }
}
