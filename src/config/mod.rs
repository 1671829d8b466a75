//! Runtime configuration for factories and caches

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CACHE_MAX_SIZE, EARTH_RADIUS_METERS};
use crate::{GeoError, Result};

/// Tunable settings, loadable from JSON
///
/// Missing fields fall back to their defaults:
///
/// ```rust
/// use geotag::config::GeoConfig;
///
/// let config = GeoConfig::from_json_str(r#"{ "bounded_cache_max_size": 8 }"#).unwrap();
/// assert_eq!(config.bounded_cache_max_size, 8);
/// assert_eq!(config.earth_radius_meters, 6_371_000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Radius used when a spheric coordinate is created without one
    pub earth_radius_meters: f64,
    /// Capacity of bounded caches built from this configuration
    pub bounded_cache_max_size: usize,
}

impl GeoConfig {
    /// Set the default radius for spheric coordinates
    pub fn with_earth_radius_meters(mut self, radius: f64) -> Self {
        self.earth_radius_meters = radius;
        self
    }

    /// Set the capacity of bounded caches
    pub fn with_bounded_cache_max_size(mut self, max_size: usize) -> Self {
        self.bounded_cache_max_size = max_size;
        self
    }

    /// Reject settings no factory or cache could work with
    pub fn validate(&self) -> Result<()> {
        if !self.earth_radius_meters.is_finite() || self.earth_radius_meters <= 0.0 {
            return Err(GeoError::Config(format!(
                "earth_radius_meters must be positive and finite, got {}",
                self.earth_radius_meters
            )));
        }
        if self.bounded_cache_max_size == 0 {
            return Err(GeoError::Config(
                "bounded_cache_max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GeoConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            earth_radius_meters: EARTH_RADIUS_METERS,
            bounded_cache_max_size: DEFAULT_CACHE_MAX_SIZE,
        }
    }
}
