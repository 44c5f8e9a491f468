use itinerary::{Location, Presence};
use walkers::Position;

/// Icon drawn for a destination marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    Tree,
    Santa,
    Gift,
}

/// How a destination is drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub icon: MarkerIcon,
    /// Draws a halo behind the icon.
    pub highlighted: bool,
}

impl MarkerStyle {
    pub fn for_presence(presence: Presence) -> Self {
        match presence {
            Presence::Upcoming => Self {
                icon: MarkerIcon::Tree,
                highlighted: false,
            },
            Presence::Present => Self {
                icon: MarkerIcon::Santa,
                highlighted: true,
            },
            Presence::Departed => Self {
                icon: MarkerIcon::Gift,
                highlighted: false,
            },
        }
    }
}

pub fn to_position(location: &Location) -> Position {
    Position::from_lat_lon(location.lat, location.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_follows_presence() {
        assert_eq!(
            MarkerStyle::for_presence(Presence::Upcoming).icon,
            MarkerIcon::Tree
        );
        assert_eq!(
            MarkerStyle::for_presence(Presence::Departed).icon,
            MarkerIcon::Gift
        );

        let present = MarkerStyle::for_presence(Presence::Present);
        assert_eq!(present.icon, MarkerIcon::Santa);
        assert!(present.highlighted);
    }

    #[test]
    fn test_departed_wins_over_present() {
        let presence = Presence::from_flags(true, true);
        assert_eq!(MarkerStyle::for_presence(presence).icon, MarkerIcon::Gift);
    }

    #[test]
    fn test_position_keeps_coordinates() {
        let position = to_position(&Location::new(-34.6, -58.4));
        assert_eq!(position.lat(), -34.6);
        assert_eq!(position.lon(), -58.4);
    }
}
