//! Geographic coordinates and "same place" matching.
//!
//! # Invariants
//! - Distances are great-circle (haversine) distances in meters.
//! - Matching is pure and accepts any finite pair; values are not
//!   range-checked, since imported pairs keep the order they were captured in.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, as used by common web-map libraries.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Two points closer than this are treated as the same restaurant.
pub const DEFAULT_SAME_PLACE_THRESHOLD_METERS: f64 = 5.0;

/// Latitude/longitude pair in decimal degrees.
///
/// Serialized as a `[lat, lng]` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that both values are finite numbers.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.latitude.is_finite() && self.longitude.is_finite() {
            Ok(())
        } else {
            Err(ValidationError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinates> for (f64, f64) {
    fn from(value: Coordinates) -> Self {
        (value.latitude, value.longitude)
    }
}

/// Great-circle surface distance between two points, in meters.
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `h` a hair above 1 for near-antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_M * c
}

/// Returns whether `a` and `b` are within `threshold_meters` of each other.
pub fn is_same_place(a: Coordinates, b: Coordinates, threshold_meters: f64) -> bool {
    distance_meters(a, b) <= threshold_meters
}

/// [`is_same_place`] with the default 5 m threshold.
pub fn is_same_place_default(a: Coordinates, b: Coordinates) -> bool {
    is_same_place(a, b, DEFAULT_SAME_PLACE_THRESHOLD_METERS)
}
