//! Geographic point with an explicit axis order.

use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

/// Geographic point in EPSG:4326 degrees.
///
/// Geocoders and humans usually speak in (latitude, longitude); geometry
/// wants (x = longitude, y = latitude). Anything entering the crate is
/// converted into this type once, and everything downstream reads the named
/// fields instead of tuple positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Build from the (latitude, longitude) order geocoders return
    pub fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        Self::new(longitude, latitude)
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.longitude, p.latitude)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        Self::new(p.x(), p.y())
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}
