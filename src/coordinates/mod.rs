//! Coordinate value objects
//!
//! A coordinate is one of a closed set of representations, all sharing the
//! [`CoordinateValue`] contract. Distance, equality and hashing are defined
//! once, on the canonical Cartesian form, so they behave the same whichever
//! representations are compared.

pub mod cartesian;
pub mod factory;
pub mod record;
pub mod spheric;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use self::cartesian::CartesianCoordinate;
pub use self::factory::{CoordinateFactory, CoordinateKey};
pub use self::record::CoordinateRecord;
pub use self::spheric::SphericCoordinate;

/// Capability shared by every coordinate representation
pub trait CoordinateValue {
    /// Canonical Cartesian form; pure and deterministic
    fn as_cartesian(&self) -> &CartesianCoordinate;

    /// Straight-line distance to `other`, measured between Cartesian forms
    ///
    /// Symmetric and never negative. It is zero exactly when both sides have
    /// the same Cartesian form, except that components differing only in the
    /// sign of zero are unequal yet zero apart.
    fn distance_to(&self, other: &dyn CoordinateValue) -> f64 {
        self.as_cartesian().euclidean_distance(other.as_cartesian())
    }

    /// Value equality across representations
    fn is_equal(&self, other: &dyn CoordinateValue) -> bool {
        self.as_cartesian() == other.as_cartesian()
    }
}

/// Shared handle to a canonical coordinate
///
/// Cloning is cheap and keeps pointing at the same instance.
#[derive(Debug, Clone)]
pub enum Coordinate {
    Cartesian(Arc<CartesianCoordinate>),
    Spheric(Arc<SphericCoordinate>),
}

impl Coordinate {
    /// True if both handles point at the very same instance
    pub fn ptr_eq(&self, other: &Coordinate) -> bool {
        match (self, other) {
            (Coordinate::Cartesian(a), Coordinate::Cartesian(b)) => Arc::ptr_eq(a, b),
            (Coordinate::Spheric(a), Coordinate::Spheric(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Plain-data form for persistence
    pub fn to_record(&self) -> CoordinateRecord {
        CoordinateRecord::from(self)
    }
}

impl CoordinateValue for Coordinate {
    fn as_cartesian(&self) -> &CartesianCoordinate {
        match self {
            Coordinate::Cartesian(c) => c.as_cartesian(),
            Coordinate::Spheric(s) => s.as_cartesian(),
        }
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_cartesian().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Cartesian(c) => write!(f, "{}", c),
            Coordinate::Spheric(s) => write!(f, "{}", s),
        }
    }
}
