//! Location query variants accepted by the boundary builder.

use geo::Centroid;
use geo_types::{Geometry, GeometryCollection, Point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::GeoPoint;

/// Shape of a query, as decided by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// A set of features carrying their own geometry
    Polygon,
    /// A coordinate pair or point geometry
    Coordinates,
    /// OpenStreetMap object identifier (leading digits)
    OsmId,
    /// Free-text address
    Address,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Polygon => "polygon",
            QueryKind::Coordinates => "coordinates",
            QueryKind::OsmId => "osmid",
            QueryKind::Address => "address",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single feature: geometry plus free-form attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            geometry: geometry.into(),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

/// Table-like collection of features, each row with a geometry column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonSet {
    pub features: Vec<Feature>,
}

impl PolygonSet {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Centroid of all feature geometries taken together
    pub fn centroid(&self) -> Option<GeoPoint> {
        let collection: GeometryCollection<f64> = self
            .features
            .iter()
            .map(|f| f.geometry.clone())
            .collect();
        collection
            .centroid()
            .map(GeoPoint::from)
            .filter(GeoPoint::is_finite)
    }
}

/// A location query
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Polygon(PolygonSet),
    Coordinates(GeoPoint),
    OsmId(String),
    Address(String),
}

impl Query {
    /// Text carried by the geocodable variants
    pub fn text(&self) -> Option<&str> {
        match self {
            Query::OsmId(s) | Query::Address(s) => Some(s),
            _ => None,
        }
    }
}

/// Coordinate pairs are read as (longitude, latitude)
impl From<(f64, f64)> for Query {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Query::Coordinates(GeoPoint::new(longitude, latitude))
    }
}

impl From<Point<f64>> for Query {
    fn from(p: Point<f64>) -> Self {
        Query::Coordinates(p.into())
    }
}

impl From<GeoPoint> for Query {
    fn from(p: GeoPoint) -> Self {
        Query::Coordinates(p)
    }
}

impl From<PolygonSet> for Query {
    fn from(set: PolygonSet) -> Self {
        Query::Polygon(set)
    }
}
