//! Constants module for geo-location calculations

// Earth
/// Mean Earth radius in meters, the default radius of a spheric coordinate
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// Angular bounds (degrees, inclusive)
/// Southernmost valid latitude
pub const MIN_LATITUDE: f64 = -90.0;
/// Northernmost valid latitude
pub const MAX_LATITUDE: f64 = 90.0;
/// Westernmost valid longitude
pub const MIN_LONGITUDE: f64 = -180.0;
/// Easternmost valid longitude
pub const MAX_LONGITUDE: f64 = 180.0;

// Caching
/// Capacity of a bounded cache when none is configured
pub const DEFAULT_CACHE_MAX_SIZE: usize = 50;
