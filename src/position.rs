use std::fmt;

use crate::error::{NavError, Result};

/// A geodetic position in decimal degrees (WGS84).
///
/// The canonical representation every parsed coordinate format converges to.
/// Range checked at construction and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    lat: f64,
    lon: f64,
}

impl GeoPosition {
    /// Create a position from decimal degrees. Latitude must be within
    /// [-90, 90] and longitude within [-180, 180].
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(NavError::Range(format!("latitude {lat} outside ±90°")));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(NavError::Range(format!("longitude {lon} outside ±180°")));
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in decimal degrees (negative = South).
    pub fn lat(self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees (negative = West).
    pub fn lon(self) -> f64 {
        self.lon
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}
