//! Canonicalizing construction of coordinates
//!
//! The [`CoordinateFactory`] owns one [`FlyweightCache`] per representation.
//! Each request derives a key from the exact bit patterns of its inputs and
//! either returns the instance already stored under that key or validates,
//! builds and stores a new one. The cache lock covers the whole lookup, so
//! concurrent requests for the same value always see a single instance.
//!
//! Hosts normally construct one factory at startup and pass it to every
//! component that creates coordinates. [`CoordinateFactory::global`] exists
//! for code that cannot be handed one explicitly.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;

use super::cartesian::CartesianCoordinate;
use super::record::CoordinateRecord;
use super::spheric::SphericCoordinate;
use super::Coordinate;
use crate::cache::FlyweightCache;
use crate::config::GeoConfig;
use crate::Result;

lazy_static! {
    /// Process-wide factory with the default configuration
    static ref GLOBAL_FACTORY: CoordinateFactory = CoordinateFactory::new();
}

/// Cache key built from the bit patterns of three `f64` components
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey([u64; 3]);

impl CoordinateKey {
    pub(crate) fn new(a: f64, b: f64, c: f64) -> Self {
        CoordinateKey([a.to_bits(), b.to_bits(), c.to_bits()])
    }
}

impl fmt::Debug for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(
            f,
            "({}, {}, {})",
            f64::from_bits(a),
            f64::from_bits(b),
            f64::from_bits(c)
        )
    }
}

/// Entry point for creating canonical coordinate instances
#[derive(Debug)]
pub struct CoordinateFactory {
    config: GeoConfig,
    cartesian: FlyweightCache<CoordinateKey, Arc<CartesianCoordinate>>,
    spheric: FlyweightCache<CoordinateKey, Arc<SphericCoordinate>>,
}

impl CoordinateFactory {
    /// Create a factory with the default configuration
    pub fn new() -> Self {
        Self::from_valid_config(GeoConfig::default())
    }

    /// Create a factory using `config`
    ///
    /// # Errors
    ///
    /// [`GeoError::Config`](crate::GeoError::Config) if the configuration
    /// does not validate.
    pub fn with_config(config: GeoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GeoConfig) -> Self {
        Self {
            config,
            cartesian: FlyweightCache::new(),
            spheric: FlyweightCache::new(),
        }
    }

    /// The process-wide factory
    ///
    /// Created on first use with [`GeoConfig::default`] and never torn down.
    pub fn global() -> &'static CoordinateFactory {
        &GLOBAL_FACTORY
    }

    /// Configuration this factory was built with
    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Canonical Cartesian coordinate as a [`Coordinate`] handle
    pub fn cartesian(&self, x: f64, y: f64, z: f64) -> Result<Coordinate> {
        self.cartesian_coordinate(x, y, z).map(Coordinate::Cartesian)
    }

    /// Canonical Cartesian coordinate for `(x, y, z)`
    ///
    /// # Errors
    ///
    /// [`GeoError::InvalidArgument`](crate::GeoError::InvalidArgument) for
    /// non-finite components.
    pub fn cartesian_coordinate(&self, x: f64, y: f64, z: f64) -> Result<Arc<CartesianCoordinate>> {
        let coordinate = CartesianCoordinate::new(x, y, z)?;
        self.cartesian
            .get_or_insert(coordinate.key(), Arc::new(coordinate))
    }

    /// Canonical spheric coordinate on a sphere of the configured default radius
    pub fn spheric(&self, latitude: f64, longitude: f64) -> Result<Coordinate> {
        self.spheric_with_radius(latitude, longitude, self.config.earth_radius_meters)
    }

    /// Canonical spheric coordinate as a [`Coordinate`] handle
    pub fn spheric_with_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius: f64,
    ) -> Result<Coordinate> {
        self.spheric_coordinate(latitude, longitude, radius)
            .map(Coordinate::Spheric)
    }

    /// Canonical spheric coordinate for `(latitude, longitude, radius)`
    ///
    /// The Cartesian form is computed only when the spheric value is new, and
    /// is itself canonicalized through this factory.
    ///
    /// # Errors
    ///
    /// [`GeoError::InvalidArgument`](crate::GeoError::InvalidArgument) for
    /// out-of-range angles or a radius that is not positive.
    pub fn spheric_coordinate(
        &self,
        latitude: f64,
        longitude: f64,
        radius: f64,
    ) -> Result<Arc<SphericCoordinate>> {
        SphericCoordinate::validate(latitude, longitude, radius)?;
        let key = SphericCoordinate::key(latitude, longitude, radius);

        // Lock order is always spheric, then cartesian
        self.spheric.get_or_insert_with(key, || {
            let (x, y, z) = SphericCoordinate::to_cartesian_components(latitude, longitude, radius);
            let cartesian = self.cartesian_coordinate(x, y, z)?;
            debug!(
                "new spheric coordinate ({}, {}, {}) -> {}",
                latitude, longitude, radius, cartesian
            );
            Ok(Arc::new(SphericCoordinate::from_parts(
                latitude, longitude, radius, cartesian,
            )))
        })
    }

    /// Rebuild a canonical coordinate from its persisted record
    ///
    /// A spheric record without a radius uses the configured default.
    pub fn from_record(&self, record: &CoordinateRecord) -> Result<Coordinate> {
        match *record {
            CoordinateRecord::Cartesian { x, y, z } => self.cartesian(x, y, z),
            CoordinateRecord::Spheric {
                latitude,
                longitude,
                radius,
            } => self.spheric_with_radius(
                latitude,
                longitude,
                radius.unwrap_or(self.config.earth_radius_meters),
            ),
        }
    }

    /// Number of distinct Cartesian instances created so far
    pub fn cartesian_count(&self) -> Result<usize> {
        self.cartesian.len()
    }

    /// Number of distinct spheric instances created so far
    pub fn spheric_count(&self) -> Result<usize> {
        self.spheric.len()
    }
}

impl Default for CoordinateFactory {
    fn default() -> Self {
        Self::new()
    }
}
