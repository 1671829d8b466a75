//! # Spheric Coordinate Module
//!
//! Latitude/longitude/radius representation of a point, as attached to a
//! geo-tagged photo. Latitude and longitude are given in degrees; the radius
//! is the distance from the origin and defaults to the mean Earth radius in
//! meters, which makes distances come out in meters.
//!
//! ## Conversion
//!
//! Each instance computes its Cartesian form once, at construction:
//!
//! ```text
//! x = radius * cos(lat) * cos(lon)
//! y = radius * cos(lat) * sin(lon)
//! z = radius * sin(lat)
//! ```
//!
//! The Cartesian form is itself obtained from the factory, so two spheric
//! coordinates that land on the same point share one Cartesian instance.
//! Distances are straight-line (chord) distances between the two Cartesian
//! points, not great-circle distances.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::cartesian::CartesianCoordinate;
use super::factory::CoordinateKey;
use super::CoordinateValue;
use crate::constants::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
use crate::validation::{require_in_range, require_positive};
use crate::Result;

/// Immutable latitude/longitude/radius coordinate
///
/// Only [`CoordinateFactory`](super::CoordinateFactory) creates instances,
/// because the cached Cartesian form has to come from the same factory.
///
/// Equality and hashing follow the Cartesian form, not the stored angles:
/// `(90, 0, r)` and `(90, 45, r)` name the same pole only if their conversions
/// agree bit for bit.
#[derive(Debug, Clone)]
pub struct SphericCoordinate {
    latitude: f64,
    longitude: f64,
    radius: f64,
    cartesian: Arc<CartesianCoordinate>,
}

impl SphericCoordinate {
    /// Checks latitude and longitude bounds (inclusive) and a positive radius
    ///
    /// # Errors
    ///
    /// [`GeoError::InvalidArgument`](crate::GeoError::InvalidArgument) for
    /// out-of-range or non-finite values.
    pub fn validate(latitude: f64, longitude: f64, radius: f64) -> Result<()> {
        require_in_range(latitude, MIN_LATITUDE, MAX_LATITUDE, "latitude")?;
        require_in_range(longitude, MIN_LONGITUDE, MAX_LONGITUDE, "longitude")?;
        require_positive(radius, "radius")?;
        Ok(())
    }

    /// Standard spherical-to-Cartesian conversion, angles in degrees
    pub fn to_cartesian_components(latitude: f64, longitude: f64, radius: f64) -> (f64, f64, f64) {
        let lat = latitude.to_radians();
        let lon = longitude.to_radians();
        let cos_lat = lat.cos();
        (
            radius * cos_lat * lon.cos(),
            radius * cos_lat * lon.sin(),
            radius * lat.sin(),
        )
    }

    /// Assemble an already validated coordinate around its canonical Cartesian form
    pub(crate) fn from_parts(
        latitude: f64,
        longitude: f64,
        radius: f64,
        cartesian: Arc<CartesianCoordinate>,
    ) -> Self {
        SphericCoordinate {
            latitude,
            longitude,
            radius,
            cartesian,
        }
    }

    pub(crate) fn key(latitude: f64, longitude: f64, radius: f64) -> CoordinateKey {
        CoordinateKey::new(latitude, longitude, radius)
    }

    /// Latitude in degrees, within [-90, 90]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, within [-180, 180]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Distance from the origin
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The shared Cartesian instance computed at construction
    pub fn cartesian(&self) -> &Arc<CartesianCoordinate> {
        &self.cartesian
    }
}

impl CoordinateValue for SphericCoordinate {
    fn as_cartesian(&self) -> &CartesianCoordinate {
        &self.cartesian
    }
}

impl PartialEq for SphericCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.as_cartesian() == other.as_cartesian()
    }
}

impl Eq for SphericCoordinate {}

impl Hash for SphericCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_cartesian().hash(state);
    }
}

impl fmt::Display for SphericCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.latitude, self.longitude, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EARTH_RADIUS_METERS;
    use crate::coordinates::CoordinateFactory;
    use crate::GeoError;

    #[test]
    fn test_validate_boundaries() {
        assert!(SphericCoordinate::validate(MIN_LATITUDE, 0.0, 1.0).is_ok());
        assert!(SphericCoordinate::validate(MAX_LATITUDE, 0.0, 1.0).is_ok());
        assert!(SphericCoordinate::validate(0.0, MIN_LONGITUDE, 1.0).is_ok());
        assert!(SphericCoordinate::validate(0.0, MAX_LONGITUDE, 1.0).is_ok());

        for (lat, lon, radius) in [
            (MIN_LATITUDE - 0.000001, 0.0, 1.0),
            (MAX_LATITUDE + 0.000001, 0.0, 1.0),
            (0.0, MIN_LONGITUDE - 0.000001, 1.0),
            (0.0, MAX_LONGITUDE + 0.000001, 1.0),
            (0.0, 0.0, 0.0),
            (0.0, 0.0, -1.0),
            (f64::NAN, 0.0, 1.0),
            (0.0, 0.0, f64::INFINITY),
        ] {
            assert!(
                matches!(
                    SphericCoordinate::validate(lat, lon, radius),
                    Err(GeoError::InvalidArgument(_))
                ),
                "({}, {}, {}) should be rejected",
                lat,
                lon,
                radius
            );
        }
    }

    #[test]
    fn test_conversion_axes() {
        let (x, y, z) = SphericCoordinate::to_cartesian_components(0.0, 0.0, 1.0);
        assert_eq!((x, y, z), (1.0, 0.0, 0.0));

        let (x, y, z) = SphericCoordinate::to_cartesian_components(90.0, 0.0, 2.0);
        assert!(x.abs() < 1e-15);
        assert_eq!(y, 0.0);
        assert_eq!(z, 2.0);

        let (x, y, z) = SphericCoordinate::to_cartesian_components(0.0, 90.0, 1.0);
        assert!(x.abs() < 1e-15);
        assert_eq!(y, 1.0);
        assert_eq!(z, 0.0);
    }

    #[test]
    fn test_distance_in_meters() {
        let factory = CoordinateFactory::new();
        let nuremberg = factory.spheric_coordinate(49.453941, 11.077279, EARTH_RADIUS_METERS).unwrap();
        let erlangen = factory.spheric_coordinate(49.573845, 11.027041, EARTH_RADIUS_METERS).unwrap();

        let distance = nuremberg.distance_to(&*erlangen);
        assert!((distance - 13817.0).abs() < 0.5, "distance was {}", distance);
    }

    #[test]
    fn test_equality_and_hash_follow_cartesian_form() {
        use std::collections::hash_map::DefaultHasher;

        let factory = CoordinateFactory::new();
        let a = factory.spheric_coordinate(49.453941, 11.077279, EARTH_RADIUS_METERS).unwrap();
        let b = factory.spheric_coordinate(49.453941, 11.077279, EARTH_RADIUS_METERS).unwrap();
        let c = factory.spheric_coordinate(49.453941, 11.077278, EARTH_RADIUS_METERS).unwrap();

        let hash = |coord: &SphericCoordinate| {
            let mut hasher = DefaultHasher::new();
            coord.hash(&mut hasher);
            hasher.finish()
        };

        assert_eq!(*a, *b);
        assert_eq!(hash(&*a), hash(&*b));
        assert_ne!(*a, *c);
        assert_ne!(hash(&*a), hash(&*c));
    }

    #[test]
    fn test_display() {
        let factory = CoordinateFactory::new();
        let coord = factory.spheric_coordinate(12.5, -0.25, 3.0).unwrap();
        assert_eq!(coord.to_string(), "(12.5, -0.25, 3)");
    }
}
