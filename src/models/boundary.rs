//! Boundary region handed to the map renderer.

use geo::{Area, Centroid, Validation};
use geo_types::Polygon;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::GeoPoint;

/// EPSG code of geographic longitude/latitude
pub const WGS84: u32 = 4326;

/// Coordinate reference system attached to a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    Epsg(u32),
}

impl Crs {
    pub fn wgs84() -> Self {
        Crs::Epsg(WGS84)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crs::Epsg(code) => write!(f, "EPSG:{}", code),
        }
    }
}

/// Single-feature region with its CRS.
///
/// Only the builder creates these, and it always hands back EPSG:4326.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygon: Polygon<f64>,
    crs: Crs,
}

impl Boundary {
    pub(crate) fn new(polygon: Polygon<f64>, crs: Crs) -> Self {
        Self { polygon, crs }
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn centroid(&self) -> Option<GeoPoint> {
        self.polygon.centroid().map(GeoPoint::from)
    }

    /// Non-empty with a non-zero area and no self-intersections
    pub fn is_valid(&self) -> bool {
        self.polygon.exterior().0.len() >= 4
            && self.polygon.unsigned_area() > 0.0
            && self.polygon.is_valid()
    }

    /// GeoJSON FeatureCollection with one feature and a named CRS member
    pub fn to_geojson(&self) -> Value {
        let ring = |ls: &geo_types::LineString<f64>| -> Vec<[f64; 2]> {
            ls.coords().map(|c| [c.x, c.y]).collect()
        };

        let mut rings = vec![ring(self.polygon.exterior())];
        rings.extend(self.polygon.interiors().iter().map(ring));

        json!({
            "type": "FeatureCollection",
            "crs": {
                "type": "name",
                "properties": { "name": self.crs.to_string() }
            },
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": rings
                }
            }]
        })
    }
}
