//! Resolving text queries to a single point.
//!
//! The builder only sees the [`Geocoder`] trait; [`NominatimGeocoder`] is
//! the network-backed implementation.

mod nominatim;

pub use nominatim::NominatimGeocoder;

use std::future::Future;

use thiserror::Error;

use crate::models::GeoPoint;

/// Errors from a geocoding lookup
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Geocoder answered with a non-success status.
    #[error("Geocoder returned status {0}")]
    Status(u16),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Lookup succeeded but found nothing.
    #[error("No match found for {query:?}")]
    NoMatch { query: String },
}

/// Something that turns free text or an OSM id into a point
pub trait Geocoder {
    fn geocode(&self, query: &str) -> impl Future<Output = Result<GeoPoint, GeocodeError>> + Send;
}
