//! Core data models for boundary construction.

pub mod boundary;
pub mod point;
pub mod query;

pub use boundary::{Boundary, Crs};
pub use point::GeoPoint;
pub use query::{Feature, PolygonSet, Query, QueryKind};
