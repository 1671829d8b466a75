//! # Cartesian Coordinate Module
//!
//! This module provides the 3D Cartesian coordinate that serves as the common
//! comparison basis for every coordinate representation in the crate.
//!
//! ## Design Philosophy
//!
//! Every representation converts to a `CartesianCoordinate`, and distance,
//! equality and hashing are all defined on that form. Adding a new
//! representation therefore only requires a conversion to Cartesian, not a
//! conversion rule to every other representation.
//!
//! ## Exactness
//!
//! Components are compared by their IEEE 754 bit pattern:
//! - Values that differ in the last representable bit are unequal
//! - `0.0` and `-0.0` are distinct, matching the hash
//! - NaN and the infinities are rejected at construction, so they never
//!   reach a comparison
//!
//! ## Examples
//!
//! ```rust
//! use geotag::coordinates::CoordinateFactory;
//! use geotag::CoordinateValue;
//!
//! let factory = CoordinateFactory::new();
//! let a = factory.cartesian(3.0, 4.0, 0.0).unwrap();
//! let b = factory.cartesian(0.0, 0.0, 0.0).unwrap();
//! assert_eq!(a.distance_to(&b), 5.0);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use nalgebra::Vector3;

use super::factory::{CoordinateFactory, CoordinateKey};
use super::spheric::SphericCoordinate;
use super::CoordinateValue;
use crate::constants::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
use crate::validation::require_finite;
use crate::{GeoError, Result};

/// Immutable point in 3D space given by its x/y/z components
///
/// Obtain canonical instances through [`CoordinateFactory::cartesian`]; two
/// requests for the same triple then share one allocation.
///
/// # Storage Strategy
///
/// - Each component stored as a finite `f64`
/// - Fields are private and written once, so a published instance never changes
/// - Compatible with nalgebra `Vector3` for linear algebra operations
#[derive(Debug, Clone, Copy)]
pub struct CartesianCoordinate {
    x: f64,
    y: f64,
    z: f64,
}

impl CartesianCoordinate {
    /// Creates a new Cartesian coordinate
    ///
    /// This builds a standalone value. Use the factory when a canonical,
    /// shared instance is wanted.
    ///
    /// # Errors
    ///
    /// [`GeoError::InvalidArgument`] if any component is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geotag::coordinates::CartesianCoordinate;
    ///
    /// let coord = CartesianCoordinate::new(1.0, 2.0, 3.0).unwrap();
    /// assert_eq!(coord.y(), 2.0);
    ///
    /// assert!(CartesianCoordinate::new(f64::NAN, 0.0, 0.0).is_err());
    /// ```
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        Ok(CartesianCoordinate {
            x: require_finite(x, "x")?,
            y: require_finite(y, "y")?,
            z: require_finite(z, "z")?,
        })
    }

    /// Value on the x-axis
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Value on the y-axis
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Value on the z-axis
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Euclidean distance from the origin
    ///
    /// # Mathematical Formula
    ///
    /// `magnitude = sqrt(x² + y² + z²)`
    pub fn magnitude(&self) -> f64 {
        scaled_norm(&self.to_vector3())
    }

    /// Euclidean distance to another Cartesian coordinate
    ///
    /// # Mathematical Formula
    ///
    /// `distance = sqrt(Δx² + Δy² + Δz²)`
    ///
    /// Nonzero for any two numerically different points, however close or
    /// far apart. Only `0.0` against `-0.0` components give a zero distance
    /// between unequal coordinates.
    pub fn euclidean_distance(&self, other: &CartesianCoordinate) -> f64 {
        // A delta that overflows means the distance itself exceeds f64::MAX
        scaled_norm(&(self.to_vector3() - other.to_vector3()))
    }

    /// Converts to nalgebra Vector3 for linear algebra operations
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geotag::coordinates::CartesianCoordinate;
    ///
    /// let coord = CartesianCoordinate::new(1.0, 2.0, 3.0).unwrap();
    /// let vec = coord.to_vector3();
    /// assert_eq!(vec.z, 3.0);
    /// ```
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Converts to a canonical spheric coordinate through `factory`
    ///
    /// The result has radius r = |(x, y, z)|, latitude = asin(z / r) and
    /// longitude = atan2(y, x), both in degrees.
    /// The round trip back to Cartesian is not guaranteed to be bit-exact.
    ///
    /// # Errors
    ///
    /// [`GeoError::InvalidArgument`] for the origin, which has no direction and
    /// therefore no spheric form with a positive radius.
    pub fn as_spheric(&self, factory: &CoordinateFactory) -> Result<Arc<SphericCoordinate>> {
        let radius = self.magnitude();
        if radius == 0.0 {
            return Err(GeoError::InvalidArgument(
                "The origin has no spheric representation".to_string(),
            ));
        }

        // Rounding in the magnitude can push |z / r| marginally past 1.0
        let latitude = (self.z / radius)
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(MIN_LATITUDE, MAX_LATITUDE);
        let longitude = self
            .y
            .atan2(self.x)
            .to_degrees()
            .clamp(MIN_LONGITUDE, MAX_LONGITUDE);

        factory.spheric_coordinate(latitude, longitude, radius)
    }

    pub(crate) fn key(&self) -> CoordinateKey {
        CoordinateKey::new(self.x, self.y, self.z)
    }
}

/// Norm of `v` computed on `v / max|v_i|`, so squaring neither overflows
/// nor underflows for finite input
fn scaled_norm(v: &Vector3<f64>) -> f64 {
    let scale = v.amax();
    if scale == 0.0 || scale.is_infinite() {
        scale
    } else {
        scale * v.unscale(scale).norm()
    }
}

impl CoordinateValue for CartesianCoordinate {
    fn as_cartesian(&self) -> &CartesianCoordinate {
        self
    }
}

impl PartialEq for CartesianCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl Eq for CartesianCoordinate {}

impl Hash for CartesianCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.z.to_bits().hash(state);
    }
}

impl fmt::Display for CartesianCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(coord: &CartesianCoordinate) -> u64 {
        let mut hasher = DefaultHasher::new();
        coord.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_cartesian_creation() {
        let coord = CartesianCoordinate::new(1.0, 2.0, 3.0).unwrap();
        assert_eq!(coord.x(), 1.0);
        assert_eq!(coord.y(), 2.0);
        assert_eq!(coord.z(), 3.0);
    }

    #[test]
    fn test_rejects_non_finite_components() {
        assert!(CartesianCoordinate::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(CartesianCoordinate::new(0.0, f64::INFINITY, 0.0).is_err());
        assert!(CartesianCoordinate::new(0.0, 0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_magnitude_calculation() {
        let coord = CartesianCoordinate::new(3.0, 4.0, 0.0).unwrap();
        assert_eq!(coord.magnitude(), 5.0);

        let zero = CartesianCoordinate::new(0.0, 0.0, 0.0).unwrap();
        assert_eq!(zero.magnitude(), 0.0);
    }

    #[test]
    fn test_distance() {
        let a = CartesianCoordinate::new(300.0, 70.5, 800.0).unwrap();
        let b = CartesianCoordinate::new(100.0, 30.0, 70.0).unwrap();

        let distance = a.euclidean_distance(&b);
        assert!((distance - 757.98).abs() < 0.01, "distance was {}", distance);
        assert_eq!(distance, b.euclidean_distance(&a));
        assert_eq!(a.euclidean_distance(&a), 0.0);
    }

    #[test]
    fn test_distance_at_extreme_magnitudes() {
        let far_east = CartesianCoordinate::new(1e200, 0.0, 0.0).unwrap();
        let far_west = CartesianCoordinate::new(-1e200, 0.0, 0.0).unwrap();
        assert_eq!(far_east.euclidean_distance(&far_west), 2e200);
        assert_eq!(far_east.magnitude(), 1e200);

        let tiny = CartesianCoordinate::new(1e-200, 0.0, 0.0).unwrap();
        let less_tiny = CartesianCoordinate::new(2e-200, 0.0, 0.0).unwrap();
        let distance = tiny.euclidean_distance(&less_tiny);
        assert!(distance > 0.0);
        assert_ne!(tiny, less_tiny);
        assert!((distance - 1e-200).abs() < 1e-215, "distance was {:e}", distance);

        let max = CartesianCoordinate::new(f64::MAX, 0.0, 0.0).unwrap();
        let min = CartesianCoordinate::new(-f64::MAX, 0.0, 0.0).unwrap();
        assert_eq!(max.euclidean_distance(&min), f64::INFINITY);
        let half_max = CartesianCoordinate::new(f64::MAX / 2.0, 0.0, 0.0).unwrap();
        let neg_half_max = CartesianCoordinate::new(-f64::MAX / 4.0, 0.0, 0.0).unwrap();
        let distance = half_max.euclidean_distance(&neg_half_max);
        assert!(distance.is_finite());
        assert_eq!(distance, f64::MAX * 0.75);
    }

    #[test]
    fn test_signed_zeros_are_unequal_but_zero_apart() {
        let positive_zero = CartesianCoordinate::new(0.0, 0.0, 0.0).unwrap();
        let negative_zero = CartesianCoordinate::new(-0.0, 0.0, 0.0).unwrap();
        assert_ne!(positive_zero, negative_zero);
        assert_eq!(positive_zero.euclidean_distance(&negative_zero), 0.0);
    }

    #[test]
    fn test_as_spheric_with_huge_components() {
        let factory = CoordinateFactory::new();
        let coord = CartesianCoordinate::new(1e200, 1e200, 0.0).unwrap();
        let spheric = coord.as_spheric(&factory).unwrap();

        assert!(spheric.radius().is_finite());
        assert!((spheric.radius() / 1e200 - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert!((spheric.longitude() - 45.0).abs() < 1e-12);
        assert_eq!(spheric.latitude(), 0.0);
    }

    #[test]
    fn test_equality_is_bitwise() {
        let a = CartesianCoordinate::new(1.0, 2.0, 3.0).unwrap();
        let b = CartesianCoordinate::new(1.0, 2.0, 3.0).unwrap();
        let c = CartesianCoordinate::new(1.0, 2.0, 3.0 + f64::EPSILON * 4.0).unwrap();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);

        let positive_zero = CartesianCoordinate::new(0.0, 0.0, 0.0).unwrap();
        let negative_zero = CartesianCoordinate::new(-0.0, 0.0, 0.0).unwrap();
        assert_ne!(positive_zero, negative_zero);
    }

    #[test]
    fn test_as_spheric() {
        let factory = CoordinateFactory::new();
        let coord = CartesianCoordinate::new(0.0, 0.0, 2.0).unwrap();
        let spheric = coord.as_spheric(&factory).unwrap();

        assert!((spheric.latitude() - 90.0).abs() < 1e-12);
        assert_eq!(spheric.longitude(), 0.0);
        assert_eq!(spheric.radius(), 2.0);

        let on_y_axis = CartesianCoordinate::new(0.0, 5.0, 0.0).unwrap();
        let spheric = on_y_axis.as_spheric(&factory).unwrap();
        assert!((spheric.longitude() - 90.0).abs() < 1e-12);
        assert!(spheric.latitude().abs() < 1e-12);
    }

    #[test]
    fn test_origin_has_no_spheric_form() {
        let factory = CoordinateFactory::new();
        let origin = CartesianCoordinate::new(0.0, 0.0, 0.0).unwrap();
        assert!(matches!(
            origin.as_spheric(&factory),
            Err(GeoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_display() {
        let coord = CartesianCoordinate::new(1.5, -2.0, 0.25).unwrap();
        assert_eq!(coord.to_string(), "(1.5, -2, 0.25)");
    }
}
