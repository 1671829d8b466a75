//! Plain-data form of a coordinate for persistence adapters
//!
//! A record carries a variant tag and the numbers needed to rebuild the
//! coordinate, nothing else. Turning a record back into a live coordinate
//! always goes through [`CoordinateFactory::from_record`](super::CoordinateFactory::from_record),
//! which validates it and returns the canonical instance.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Serializable coordinate: a tag plus its components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CoordinateRecord {
    Cartesian {
        x: f64,
        y: f64,
        z: f64,
    },
    Spheric {
        latitude: f64,
        longitude: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
    },
}

impl CoordinateRecord {
    /// Parse a record from JSON
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the record as JSON
    pub fn to_json_string(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&Coordinate> for CoordinateRecord {
    fn from(coordinate: &Coordinate) -> Self {
        match coordinate {
            Coordinate::Cartesian(c) => CoordinateRecord::Cartesian {
                x: c.x(),
                y: c.y(),
                z: c.z(),
            },
            Coordinate::Spheric(s) => CoordinateRecord::Spheric {
                latitude: s.latitude(),
                longitude: s.longitude(),
                radius: Some(s.radius()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::CoordinateFactory;

    #[test]
    fn test_json_shape() {
        let record = CoordinateRecord::Cartesian {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        assert_eq!(
            record.to_json_string().unwrap(),
            r#"{"kind":"cartesian","x":1.0,"y":2.0,"z":3.0}"#
        );
    }

    #[test]
    fn test_missing_radius_uses_default() {
        let record =
            CoordinateRecord::from_json_str(r#"{"kind":"spheric","latitude":10.0,"longitude":20.0}"#)
                .unwrap();
        assert_eq!(
            record,
            CoordinateRecord::Spheric {
                latitude: 10.0,
                longitude: 20.0,
                radius: None
            }
        );

        let factory = CoordinateFactory::new();
        let from_record = factory.from_record(&record).unwrap();
        let direct = factory.spheric(10.0, 20.0).unwrap();
        assert!(from_record.ptr_eq(&direct));
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let factory = CoordinateFactory::new();
        let record = CoordinateRecord::Spheric {
            latitude: 91.0,
            longitude: 0.0,
            radius: None,
        };
        assert!(factory.from_record(&record).is_err());
        assert!(CoordinateRecord::from_json_str(r#"{"kind":"polar"}"#).is_err());
    }
}
