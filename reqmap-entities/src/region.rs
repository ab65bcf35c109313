use crate::geo::{Distance, MapPoint};

/// The disk around a center point in which geocoded
/// positions are considered plausible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityRegion {
    pub center: MapPoint,
    pub max_distance: Distance,
}

impl PlausibilityRegion {
    pub const fn new(center: MapPoint, max_distance: Distance) -> Self {
        Self {
            center,
            max_distance,
        }
    }

    pub fn distance_to(&self, pos: MapPoint) -> Option<Distance> {
        MapPoint::distance(self.center, pos)
    }

    /// The boundary itself belongs to the region.
    pub fn contains(&self, pos: MapPoint) -> bool {
        self.distance_to(pos)
            .map(|d| d <= self.max_distance)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER_LAT: f64 = 55.8437;
    const CENTER_LNG: f64 = 48.5066;

    fn region(max_km: f64) -> PlausibilityRegion {
        PlausibilityRegion::new(
            MapPoint::from_lat_lng_deg(CENTER_LAT, CENTER_LNG),
            Distance::from_km(max_km),
        )
    }

    // Roughly `km` kilometers north of the center.
    fn north_of_center(km: f64) -> MapPoint {
        MapPoint::from_lat_lng_deg(CENTER_LAT + km / 111.2, CENTER_LNG)
    }

    #[test]
    fn contains_nearby_positions() {
        let r = region(10.0);
        assert!(r.contains(r.center));
        assert!(r.contains(north_of_center(9.0)));
    }

    #[test]
    fn rejects_remote_positions() {
        let r = region(10.0);
        assert!(!r.contains(north_of_center(11.0)));
        assert!(!r.contains(north_of_center(50.0)));
        let d = r.distance_to(north_of_center(50.0)).unwrap();
        assert!((d.to_km() - 50.0).abs() < 0.1, "{d}");
    }

    #[test]
    fn rejects_invalid_positions() {
        assert!(!region(10_000.0).contains(MapPoint::default()));
    }
}
