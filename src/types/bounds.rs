use serde::{Deserialize, Serialize};

use crate::error::BoundsError;

/// Latitude/longitude rectangle in degrees, south-west to north-east.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub sw_lat: f64,
    pub sw_lon: f64,
    pub ne_lat: f64,
    pub ne_lon: f64,
}

/// A sub-region produced by splitting a [`BoundingBox`].
pub type Tile = BoundingBox;

impl BoundingBox {
    pub fn new(sw_lat: f64, sw_lon: f64, ne_lat: f64, ne_lon: f64) -> Result<Self, BoundsError> {
        let coords = [sw_lat, sw_lon, ne_lat, ne_lon];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(BoundsError::NonFinite);
        }
        let lat_ok = |lat: f64| (-90.0..=90.0).contains(&lat);
        let lon_ok = |lon: f64| (-180.0..=180.0).contains(&lon);
        if !lat_ok(sw_lat) || !lat_ok(ne_lat) || !lon_ok(sw_lon) || !lon_ok(ne_lon) {
            return Err(BoundsError::OutOfRange);
        }
        if ne_lat <= sw_lat || ne_lon <= sw_lon {
            return Err(BoundsError::Inverted);
        }

        Ok(Self {
            sw_lat,
            sw_lon,
            ne_lat,
            ne_lon,
        })
    }

    /// Builds a box from `[swLat, swLon, neLat, neLon]`.
    pub fn from_coords(coords: [f64; 4]) -> Result<Self, BoundsError> {
        let [sw_lat, sw_lon, ne_lat, ne_lon] = coords;
        Self::new(sw_lat, sw_lon, ne_lat, ne_lon)
    }

    pub fn width(&self) -> f64 {
        (self.ne_lon - self.sw_lon).abs()
    }

    pub fn height(&self) -> f64 {
        (self.ne_lat - self.sw_lat).abs()
    }

    /// Planar area in square degrees.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Comma separated `swLat,swLon,neLat,neLon` as expected by the explore endpoint.
    pub fn to_query(&self) -> String {
        format!(
            "{},{},{},{}",
            self.sw_lat, self.sw_lon, self.ne_lat, self.ne_lon
        )
    }
}
