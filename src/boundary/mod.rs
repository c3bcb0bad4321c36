//! Boundary construction around a query point.
//!
//! The query is reduced to one point, projected into its UTM zone so the
//! radius is in metres, expanded into a circle or square there, and brought
//! back to EPSG:4326.

mod projection;
mod shape;

pub use projection::{utm_zone, PlanarCrs};
pub use shape::{circle, square, QUADRANT_SEGMENTS};

use geo::{BoundingRect, MapCoords};
use geo_types::Polygon;
use thiserror::Error;
use tracing::debug;

use crate::geocoder::{GeocodeError, Geocoder};
use crate::models::{Boundary, Crs, GeoPoint, Query};
use crate::query::classify;

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Please enter valid location details.")]
    InvalidQuery,

    #[error("Point {0} is outside the valid longitude/latitude range")]
    InvalidPoint(GeoPoint),

    #[error("Radius must be a positive number, got {0}")]
    InvalidRadius(f64),

    #[error("Rotation must be a finite number of degrees, got {0}")]
    InvalidRotation(f64),

    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Projection failed: {message}")]
    Projection { message: String },

    #[error("Boundary geometry is degenerate after reprojection")]
    Degenerate,

    #[error("Boundary around {0} encloses a pole and has no longitude/latitude polygon")]
    EnclosesPole(GeoPoint),
}

/// Shape parameters for [`build_boundary`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryOptions {
    /// Circle radius or square half-width, in metres
    pub radius: f64,
    pub is_circular: bool,
    /// Counter-clockwise; squares only
    pub rotation_degrees: f64,
}

impl BoundaryOptions {
    pub fn square(radius: f64) -> Self {
        Self {
            radius,
            is_circular: false,
            rotation_degrees: 0.0,
        }
    }

    pub fn circle(radius: f64) -> Self {
        Self {
            radius,
            is_circular: true,
            rotation_degrees: 0.0,
        }
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    fn validate(&self) -> Result<(), BoundaryError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(BoundaryError::InvalidRadius(self.radius));
        }
        if !self.is_circular && !self.rotation_degrees.is_finite() {
            return Err(BoundaryError::InvalidRotation(self.rotation_degrees));
        }
        Ok(())
    }
}

/// Reduce a query to the point the boundary is centred on
pub async fn resolve_point<G: Geocoder>(
    geocoder: &G,
    query: &Query,
) -> Result<GeoPoint, BoundaryError> {
    let kind = classify(query).ok_or(BoundaryError::InvalidQuery)?;

    let point = match query {
        Query::Coordinates(point) => *point,
        Query::Polygon(set) => set.centroid().ok_or(BoundaryError::InvalidQuery)?,
        Query::OsmId(text) | Query::Address(text) => {
            debug!("Geocoding {} query {:?}", kind, text);
            geocoder.geocode(text).await?
        }
    };

    if !in_range(point) {
        return Err(BoundaryError::InvalidPoint(point));
    }

    Ok(point)
}

/// Build a circular or square boundary around a query, in EPSG:4326
pub async fn build_boundary<G: Geocoder>(
    geocoder: &G,
    query: &Query,
    options: &BoundaryOptions,
) -> Result<Boundary, BoundaryError> {
    options.validate()?;

    let point = resolve_point(geocoder, query).await?;
    boundary_around(point, options)
}

/// Geometric half of [`build_boundary`], for callers that already have a point
pub fn boundary_around(point: GeoPoint, options: &BoundaryOptions) -> Result<Boundary, BoundaryError> {
    options.validate()?;
    if !in_range(point) {
        return Err(BoundaryError::InvalidPoint(point));
    }

    let planar = PlanarCrs::for_point(point)?;
    let center = planar.project_point(point)?;
    debug!("Projected {} into {} as ({}, {})", point, planar.crs(), center.x, center.y);

    let shape = if options.is_circular {
        circle(center, options.radius)
    } else {
        square(center, options.radius, options.rotation_degrees)
    };

    let polygon = unwrap_longitudes(planar.unproject_polygon(&shape)?, point.longitude);
    let span = polygon
        .bounding_rect()
        .map(|rect| rect.width())
        .ok_or(BoundaryError::Degenerate)?;
    if span >= 180.0 {
        return Err(BoundaryError::EnclosesPole(point));
    }

    let boundary = Boundary::new(polygon, Crs::wgs84());
    if !boundary.is_valid() {
        return Err(BoundaryError::Degenerate);
    }

    Ok(boundary)
}

/// Shift vertices by 360° so the ring stays continuous around the centre.
///
/// Near the antimeridian this leaves longitudes just past ±180.
fn unwrap_longitudes(polygon: Polygon<f64>, center_longitude: f64) -> Polygon<f64> {
    polygon.map_coords(|mut c| {
        if c.x - center_longitude > 180.0 {
            c.x -= 360.0;
        } else if c.x - center_longitude < -180.0 {
            c.x += 360.0;
        }
        c
    })
}

fn in_range(point: GeoPoint) -> bool {
    point.is_finite()
        && (-180.0..=180.0).contains(&point.longitude)
        && (-90.0..=90.0).contains(&point.latitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Feature, PolygonSet};
    use geo::{Contains, Validation};
    use geo_types::{polygon, Point};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const NEW_YORK: (f64, f64) = (-73.935242, 40.730610);

    /// Answers every lookup with a fixed point and records what it was asked
    struct FixedGeocoder {
        point: Option<GeoPoint>,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl FixedGeocoder {
        fn at(longitude: f64, latitude: f64) -> Self {
            Self {
                point: Some(GeoPoint::new(longitude, latitude)),
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                point: None,
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            self.point.ok_or_else(|| GeocodeError::NoMatch {
                query: query.to_string(),
            })
        }
    }

    fn assert_near(p: GeoPoint, longitude: f64, latitude: f64, tolerance: f64) {
        assert!(
            (p.longitude - longitude).abs() < tolerance && (p.latitude - latitude).abs() < tolerance,
            "{} not within {} of ({}, {})",
            p,
            tolerance,
            longitude,
            latitude
        );
    }

    #[tokio::test]
    async fn test_circle_around_coordinates() {
        let geocoder = FixedGeocoder::failing();
        let boundary = build_boundary(&geocoder, &NEW_YORK.into(), &BoundaryOptions::circle(10.0))
            .await
            .unwrap();

        assert_eq!(boundary.crs(), Crs::Epsg(4326));
        assert!(boundary.is_valid());
        assert_eq!(boundary.polygon().exterior().0.len(), 4 * QUADRANT_SEGMENTS + 1);
        assert_near(boundary.centroid().unwrap(), NEW_YORK.0, NEW_YORK.1, 1e-5);
        assert!(boundary.polygon().contains(&Point::new(NEW_YORK.0, NEW_YORK.1)));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);

        // 10 m is about 1.2e-4 degrees of longitude at this latitude
        let max_dx = boundary
            .polygon()
            .exterior()
            .coords()
            .map(|c| (c.x - NEW_YORK.0).abs())
            .fold(0.0, f64::max);
        assert!(max_dx > 1.0e-4 && max_dx < 1.4e-4);
    }

    #[tokio::test]
    async fn test_square_around_point_geometry() {
        let geocoder = FixedGeocoder::failing();
        let query = Query::from(Point::new(NEW_YORK.0, NEW_YORK.1));
        let boundary = build_boundary(&geocoder, &query, &BoundaryOptions::square(10.0))
            .await
            .unwrap();

        assert!(boundary.is_valid());
        assert_eq!(boundary.polygon().exterior().0.len(), 5);
        assert_near(boundary.centroid().unwrap(), NEW_YORK.0, NEW_YORK.1, 1e-5);
    }

    #[tokio::test]
    async fn test_osm_id_is_geocoded() {
        let geocoder = FixedGeocoder::at(-73.9866, 40.7306);
        let query = Query::parse("175905").unwrap();
        let boundary = build_boundary(&geocoder, &query, &BoundaryOptions::square(10.0))
            .await
            .unwrap();

        assert!(boundary.is_valid());
        assert_eq!(boundary.crs(), Crs::wgs84());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*geocoder.queries.lock().unwrap(), vec!["175905".to_string()]);
        assert_near(boundary.centroid().unwrap(), -73.9866, 40.7306, 1e-5);
    }

    #[tokio::test]
    async fn test_address_is_geocoded() {
        let geocoder = FixedGeocoder::at(-74.0088535, 40.7060855);
        let query = Query::parse("Wall Street, New York, United States").unwrap();
        let boundary = build_boundary(
            &geocoder,
            &query,
            &BoundaryOptions::square(250.0).rotated(30.0),
        )
        .await
        .unwrap();

        assert!(boundary.is_valid());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_near(boundary.centroid().unwrap(), -74.0088535, 40.7060855, 1e-5);
    }

    #[tokio::test]
    async fn test_polygon_set_uses_centroid() {
        let geocoder = FixedGeocoder::failing();
        let set = PolygonSet::new(vec![Feature::new(polygon![
            (x: 2.0, y: 48.0),
            (x: 2.2, y: 48.0),
            (x: 2.2, y: 48.2),
            (x: 2.0, y: 48.2),
            (x: 2.0, y: 48.0),
        ])]);
        let boundary = build_boundary(&geocoder, &set.into(), &BoundaryOptions::circle(100.0))
            .await
            .unwrap();

        assert!(boundary.is_valid());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert_near(boundary.centroid().unwrap(), 2.1, 48.1, 1e-4);
    }

    #[tokio::test]
    async fn test_southern_hemisphere() {
        let geocoder = FixedGeocoder::failing();
        let boundary = build_boundary(
            &geocoder,
            &(151.2093, -33.8688).into(),
            &BoundaryOptions::square(1000.0).rotated(-15.0),
        )
        .await
        .unwrap();

        assert!(boundary.polygon().is_valid());
        assert_near(boundary.centroid().unwrap(), 151.2093, -33.8688, 1e-4);
    }

    #[tokio::test]
    async fn test_invalid_query() {
        let geocoder = FixedGeocoder::at(0.0, 0.0);
        let err = build_boundary(
            &geocoder,
            &Query::Address("   ".to_string()),
            &BoundaryOptions::square(10.0),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BoundaryError::InvalidQuery));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);

        let err = build_boundary(
            &geocoder,
            &PolygonSet::default().into(),
            &BoundaryOptions::square(10.0),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidQuery));
    }

    #[tokio::test]
    async fn test_geocode_failure_propagates() {
        let geocoder = FixedGeocoder::failing();
        let err = build_boundary(
            &geocoder,
            &Query::parse("Atlantis").unwrap(),
            &BoundaryOptions::circle(10.0),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            BoundaryError::Geocode(GeocodeError::NoMatch { ref query }) if query == "Atlantis"
        ));
    }

    #[tokio::test]
    async fn test_bad_parameters() {
        let geocoder = FixedGeocoder::failing();
        let query: Query = NEW_YORK.into();

        for radius in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = build_boundary(&geocoder, &query, &BoundaryOptions::circle(radius))
                .await
                .unwrap_err();
            assert!(matches!(err, BoundaryError::InvalidRadius(_)));
        }

        let err = build_boundary(&geocoder, &query, &BoundaryOptions::square(10.0).rotated(f64::NAN))
            .await
            .unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidRotation(_)));

        // rotation is ignored for circles
        assert!(
            build_boundary(&geocoder, &query, &BoundaryOptions::circle(10.0).rotated(f64::NAN))
                .await
                .is_ok()
        );

        let err = build_boundary(&geocoder, &(40.0, 120.0).into(), &BoundaryOptions::circle(10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidPoint(_)));
    }

    #[test]
    fn test_antimeridian_stays_continuous() {
        let east = GeoPoint::new(179.9999, 0.0);
        let boundary = boundary_around(east, &BoundaryOptions::circle(1000.0)).unwrap();
        assert!(boundary.is_valid());
        assert_near(boundary.centroid().unwrap(), 179.9999, 0.0, 1e-5);
        let max_x = boundary
            .polygon()
            .exterior()
            .coords()
            .map(|c| c.x)
            .fold(f64::MIN, f64::max);
        assert!(max_x > 180.0 && max_x < 180.01);

        let west = GeoPoint::new(-179.9999, 10.0);
        let boundary = boundary_around(west, &BoundaryOptions::square(1000.0)).unwrap();
        assert!(boundary.is_valid());
        assert_near(boundary.centroid().unwrap(), -179.9999, 10.0, 1e-5);
        let min_x = boundary
            .polygon()
            .exterior()
            .coords()
            .map(|c| c.x)
            .fold(f64::MAX, f64::min);
        assert!(min_x < -180.0 && min_x > -180.01);
    }

    #[test]
    fn test_pole_is_rejected() {
        let err = boundary_around(GeoPoint::new(0.0, 89.9999), &BoundaryOptions::circle(100.0))
            .unwrap_err();
        assert!(matches!(err, BoundaryError::EnclosesPole(_)));

        // close to the pole but not around it is fine
        let boundary =
            boundary_around(GeoPoint::new(0.0, 89.99), &BoundaryOptions::circle(100.0)).unwrap();
        assert!(boundary.is_valid());
        assert_near(boundary.centroid().unwrap(), 0.0, 89.99, 1e-2);
    }

    #[test]
    fn test_rotation_keeps_area_and_centre() {
        let point = GeoPoint::new(NEW_YORK.0, NEW_YORK.1);
        let plain = boundary_around(point, &BoundaryOptions::square(500.0)).unwrap();
        let turned = boundary_around(point, &BoundaryOptions::square(500.0).rotated(45.0)).unwrap();

        use geo::Area;
        let (a, b) = (plain.polygon().unsigned_area(), turned.polygon().unsigned_area());
        assert!((a - b).abs() / a < 1e-3);
        assert_near(turned.centroid().unwrap(), NEW_YORK.0, NEW_YORK.1, 1e-5);
        assert_ne!(plain.polygon(), turned.polygon());
    }
}
