//! Geotag: canonical geo-location values and type hierarchies for photo metadata
//!
//! This crate provides the value objects behind a photo's optional
//! geo-location: Cartesian and spheric coordinates with one distance,
//! equality and hashing contract across representations, handed out as
//! canonical shared instances by a [`CoordinateFactory`]. It also provides a
//! [`TypeRegistry`] for classifying photographed entities in a single-parent,
//! cycle-free type hierarchy.
//!
//! # Examples
//!
//! ```rust
//! use geotag::{CoordinateFactory, CoordinateValue, TypeRegistry};
//!
//! let factory = CoordinateFactory::new();
//! let nuremberg = factory.spheric(49.453941, 11.077279).unwrap();
//! let erlangen = factory.spheric(49.573845, 11.027041).unwrap();
//! assert!((nuremberg.distance_to(&erlangen) - 13_817.0).abs() < 0.5);
//!
//! let registry = TypeRegistry::new();
//! let beer = registry.get_type("beer", ["water", "hops"]).unwrap();
//! let lager = registry.get_type("lager", ["malt"]).unwrap();
//! lager.attach(&beer).unwrap();
//! assert!(lager.is_subtype_of(&beer).unwrap());
//! ```

use thiserror::Error;

pub mod cache;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod hierarchy;
pub mod location;
pub mod validation;

// Re-export commonly used types
pub use config::GeoConfig;
pub use coordinates::{
    CartesianCoordinate, Coordinate, CoordinateFactory, CoordinateRecord, CoordinateValue,
    SphericCoordinate,
};
pub use hierarchy::{TypeInstance, TypeNode, TypeRegistry};
pub use location::Location;

/// Main error type for the geotag library
#[derive(Debug, Error)]
pub enum GeoError {
    /// A required argument was missing, out of range, or would break an invariant
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A lookup found no entry for the requested key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Two different values were offered for the same cache key
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    /// A thread panicked while holding a cache lock
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for geotag operations
pub type Result<T> = std::result::Result<T, GeoError>;
