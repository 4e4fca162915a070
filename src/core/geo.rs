use crate::{core::constants::EARTH_RADIUS_METERS, MapError, Result};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate, rejecting anything outside the valid ranges
    pub fn try_new(lat: f64, lng: f64) -> Result<Self> {
        let lat_lng = Self::new(lat, lng);
        lat_lng.validate()?;
        Ok(lat_lng)
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(MapError::InvalidCoordinates(format!(
                "({}, {}) is outside lat [-90, 90] / lng [-180, 180]",
                self.lat, self.lng
            )))
        }
    }

    /// Calculates the distance to another LatLng using the Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        haversine_distance(self, other)
    }

    /// Moves `distance_m` meters along `bearing` (radians, 0 = north, clockwise).
    ///
    /// Uses a local flat-earth step: the longitude offset is divided by
    /// `cos(lat)` to account for meridians converging towards the poles.
    /// Accurate for the few-hundred-meter displacements the placement pass
    /// makes. Steps past a pole come back down the opposite meridian and the
    /// longitude is wrapped into [-180, 180].
    pub fn offset_meters(&self, bearing: f64, distance_m: f64) -> LatLng {
        let d_lat = distance_m * bearing.cos() / EARTH_RADIUS_METERS;
        let d_lng =
            distance_m * bearing.sin() / (EARTH_RADIUS_METERS * self.lat.to_radians().cos());

        let mut lat = self.lat + d_lat.to_degrees();
        let mut lng = self.lng + d_lng.to_degrees();
        if lat > 90.0 {
            lat = 180.0 - lat;
            lng += 180.0;
        } else if lat < -90.0 {
            lat = -180.0 - lat;
            lng += 180.0;
        }

        LatLng::new(lat, Self::wrap_lng(lng))
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Great-circle distance in meters between two coordinates.
///
/// Symmetric in its arguments and exactly 0 for identical points.
pub fn haversine_distance(a: &LatLng, b: &LatLng) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest bounds covering every point, or `None` for an empty iterator
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self::new(first, first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        assert!(LatLng::try_new(91.0, 0.0).is_err());
        assert!(LatLng::try_new(0.0, -180.5).is_err());
        assert!(LatLng::try_new(f64::NAN, 0.0).is_err());
        assert!(matches!(
            LatLng::new(0.0, f64::INFINITY).validate(),
            Err(MapError::InvalidCoordinates(_))
        ));
        assert!(LatLng::try_new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_lat_lng_distance() {
        let nyc = LatLng::new(40.7128, -74.0060);
        let la = LatLng::new(34.0522, -118.2437);
        let distance = nyc.distance_to(&la);

        // Distance should be approximately 3936 km on a 6371 km sphere
        assert!((distance - 3_936_000.0).abs() < 10_000.0);
    }

    #[test]
    fn test_distance_identity_and_symmetry() {
        let a = LatLng::new(37.7749, -122.4194);
        let b = LatLng::new(37.77495, -122.41945);

        assert_eq!(haversine_distance(&a, &a), 0.0);
        assert_eq!(haversine_distance(&a, &b), haversine_distance(&b, &a));
        assert!(haversine_distance(&a, &b) > 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(1.0, 0.0);
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((haversine_distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_offset_meters_distance() {
        let base = LatLng::new(37.7749, -122.4194);
        for k in 0..8 {
            let bearing = std::f64::consts::TAU * k as f64 / 8.0;
            let moved = base.offset_meters(bearing, 330.0);
            assert!((base.distance_to(&moved) - 330.0).abs() < 0.05);
        }
    }

    #[test]
    fn test_offset_meters_bearings() {
        let base = LatLng::new(37.7749, -122.4194);

        let north = base.offset_meters(0.0, 500.0);
        assert!(north.lat > base.lat);
        assert!((north.lng - base.lng).abs() < 1e-12);

        let east = base.offset_meters(std::f64::consts::FRAC_PI_2, 500.0);
        assert!(east.lng > base.lng);
        assert!((east.lat - base.lat).abs() < 1e-9);
    }

    #[test]
    fn test_offset_meters_stays_in_range() {
        let east_edge = LatLng::new(0.0, 179.999);
        let moved = east_edge.offset_meters(std::f64::consts::FRAC_PI_2, 660.0);
        assert!(moved.is_valid());
        assert!(moved.lng < -179.99);
        assert!((east_edge.distance_to(&moved) - 660.0).abs() < 0.05);

        let pole = LatLng::new(90.0, 0.0);
        let over = pole.offset_meters(0.0, 660.0);
        assert!(over.is_valid());
        assert!(over.lat < 90.0);
        assert!((over.lng - 180.0).abs() < 1e-9);
        assert!((pole.distance_to(&over) - 660.0).abs() < 0.05);

        let south = LatLng::new(-89.999, 10.0).offset_meters(std::f64::consts::PI, 500.0);
        assert!(south.is_valid());
        assert!(south.lat > -90.0);
    }

    #[test]
    fn test_wrap_lng() {
        assert_eq!(LatLng::wrap_lng(-122.4194), -122.4194);
        assert_eq!(LatLng::wrap_lng(180.0), 180.0);
        assert!((LatLng::wrap_lng(180.5) + 179.5).abs() < 1e-9);
        assert!((LatLng::wrap_lng(-190.0) - 170.0).abs() < 1e-9);
        assert!((LatLng::wrap_lng(540.25) + 179.75).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_from_points() {
        let points = [
            LatLng::new(37.70, -122.50),
            LatLng::new(37.80, -122.40),
            LatLng::new(37.75, -122.45),
        ];
        let bounds = LatLngBounds::from_points(&points).unwrap();

        assert_eq!(bounds.south_west, LatLng::new(37.70, -122.50));
        assert_eq!(bounds.north_east, LatLng::new(37.80, -122.40));
        assert!(bounds.contains(&LatLng::new(37.75, -122.45)));
        assert!(!bounds.contains(&LatLng::new(37.85, -122.45)));
        assert!(LatLngBounds::from_points(&Vec::<LatLng>::new()).is_none());
    }
}
