use log::warn;
use serde::{de::Error, Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::{FeedInstant, Location};
use crate::errors::ItineraryError;

/// A stop of the tour as published by the feed.
///
/// Fields the tracker does not interpret (population, photos, ...) are kept
/// in `extra` so they reach the rendering layer untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Destination {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub location: Location,
    pub city: String,
    #[serde(default)]
    pub region: String,
    pub arrival: FeedInstant,
    pub departure: FeedInstant,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!("Invalid destination id: {other}"))),
    }
}

#[derive(Deserialize)]
struct FeedDocument {
    destinations: Vec<Value>,
}

/// The ordered list of destinations loaded from one fetch of the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Itinerary {
    pub destinations: Vec<Destination>,
    /// Feed records dropped because they could not be read as a destination.
    pub skipped: usize,
}

impl Itinerary {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self {
            destinations,
            skipped: 0,
        }
    }

    /// Parses a `{ "destinations": [...] }` document.
    ///
    /// A record with a missing or unreadable location, city or schedule is
    /// skipped with a warning; the remaining records keep their feed order.
    pub fn from_json(json: &str) -> Result<Self, ItineraryError> {
        let document: FeedDocument =
            serde_json::from_str(json).map_err(|e| ItineraryError::Parse(e.to_string()))?;

        let mut itinerary = Itinerary::default();
        for (index, record) in document.destinations.into_iter().enumerate() {
            match serde_json::from_value::<Destination>(record) {
                Ok(destination) => itinerary.destinations.push(destination),
                Err(e) => {
                    warn!("Skipping destination #{index}: {e}");
                    itinerary.skipped += 1;
                }
            }
        }

        Ok(itinerary)
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "destinations": [
            {
                "id": "takeoff",
                "location": { "lat": 84.6, "lng": 168.0 },
                "city": "Santa's Village",
                "region": "North Pole",
                "arrival": 1545645600000,
                "departure": 1545649200000,
                "population": 0
            },
            {
                "id": 17,
                "location": { "lat": -34.6, "lng": -58.4 },
                "city": "Buenos Aires",
                "arrival": "2018-12-24T23:00:00Z",
                "departure": "2018-12-24T23:01:00Z"
            }
        ]
    }"#;

    #[test]
    fn test_parse_feed_keeps_order_and_extra_fields() {
        let itinerary = Itinerary::from_json(FEED).unwrap();

        assert_eq!(itinerary.len(), 2);
        assert_eq!(itinerary.skipped, 0);
        assert_eq!(itinerary.destinations[0].id, "takeoff");
        assert_eq!(itinerary.destinations[0].region, "North Pole");
        assert_eq!(
            itinerary.destinations[0].extra.get("population"),
            Some(&Value::from(0))
        );
        assert_eq!(itinerary.destinations[1].id, "17");
        assert_eq!(itinerary.destinations[1].region, "");
        assert_eq!(itinerary.destinations[1].location, Location::new(-34.6, -58.4));
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let json = r#"{
            "destinations": [
                { "id": "a", "city": "No location", "arrival": 0, "departure": 1 },
                { "id": "b", "location": { "lat": 1.0, "lng": 2.0 }, "city": "Ok",
                  "arrival": 0, "departure": 1 },
                { "id": "c", "location": { "lat": 1.0, "lng": 2.0 }, "city": "Bad time",
                  "arrival": "soon", "departure": 1 },
                { "id": "d", "location": { "lat": 1.0, "lng": 2.0 }, "city": "No departure",
                  "arrival": 0 }
            ]
        }"#;

        let itinerary = Itinerary::from_json(json).unwrap();

        assert_eq!(itinerary.len(), 1);
        assert_eq!(itinerary.destinations[0].id, "b");
        assert_eq!(itinerary.skipped, 3);
    }

    #[test]
    fn test_empty_destination_list() {
        let itinerary = Itinerary::from_json(r#"{ "destinations": [] }"#).unwrap();
        assert!(itinerary.is_empty());
    }

    #[test]
    fn test_document_without_destinations_fails() {
        assert!(matches!(
            Itinerary::from_json(r#"{ "stops": [] }"#),
            Err(ItineraryError::Parse(_))
        ));
        assert!(matches!(
            Itinerary::from_json("<html>oops</html>"),
            Err(ItineraryError::Parse(_))
        ));
    }
}
