//! Mapbound - location queries to map boundary regions
//!
//! Classifies a query (address, coordinates, OSM id or polygon set), resolves
//! it to a point through a geocoder when needed, and builds a circular or
//! square boundary around it in EPSG:4326 for a map renderer to clip against.

pub mod boundary;
pub mod config;
pub mod geocoder;
pub mod models;
pub mod query;

pub use boundary::{build_boundary, BoundaryError, BoundaryOptions};
pub use geocoder::{GeocodeError, Geocoder, NominatimGeocoder};
pub use models::{Boundary, Crs, GeoPoint, Query, QueryKind};
pub use query::{classify, classify_text, QueryError};
