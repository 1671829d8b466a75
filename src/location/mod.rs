//! Optional geo-location attached to a photo

use log::trace;

use crate::coordinates::{Coordinate, CoordinateValue};
use crate::validation::require;
use crate::Result;

/// Where a photo was taken, if known
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    coordinate: Option<Coordinate>,
}

impl Location {
    /// Location at `coordinate`
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
        }
    }

    /// Location without a coordinate
    pub fn unknown() -> Self {
        Self::default()
    }

    /// The coordinate, if one has been set
    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    /// Replace the coordinate; `None` clears it
    pub fn set_coordinate(&mut self, coordinate: Option<Coordinate>) {
        trace!("location coordinate set to {:?}", coordinate);
        self.coordinate = coordinate;
    }

    /// Distance between two locations
    ///
    /// # Errors
    ///
    /// [`GeoError::InvalidArgument`](crate::GeoError::InvalidArgument) if
    /// either location has no coordinate.
    pub fn distance_to(&self, other: &Location) -> Result<f64> {
        let here = require(self.coordinate(), "coordinate")?;
        let there = require(other.coordinate(), "other coordinate")?;
        Ok(here.distance_to(there))
    }
}
