//! Argument guards shared by every constructor in the crate
//!
//! Each guard either hands the checked value back or fails with
//! [`GeoError::InvalidArgument`], so call sites can chain them with `?`.

use crate::{GeoError, Result};

/// Unwraps an optional argument, failing when it is absent
pub fn require<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| GeoError::InvalidArgument(format!("Argument {} may not be empty", name)))
}

/// Rejects NaN and both infinities
pub fn require_finite(value: f64, name: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeoError::InvalidArgument(format!(
            "Value {} is not finite: {}",
            name, value
        )))
    }
}

/// Checks that `value` is finite and lies within `[min, max]`
pub fn require_in_range(value: f64, min: f64, max: f64, name: &str) -> Result<f64> {
    let value = require_finite(value, name)?;
    if value < min || value > max {
        return Err(GeoError::InvalidArgument(format!(
            "Invalid {}: {} (expected {}..={})",
            name, value, min, max
        )));
    }
    Ok(value)
}

/// Checks that `value` is finite and strictly greater than zero
pub fn require_positive(value: f64, name: &str) -> Result<f64> {
    let value = require_finite(value, name)?;
    if value <= 0.0 {
        return Err(GeoError::InvalidArgument(format!(
            "Invalid {}: {} (must be positive)",
            name, value
        )));
    }
    Ok(value)
}
