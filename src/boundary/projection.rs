//! UTM projection used while building shapes in metres.

use geo::MapCoords;
use geo_types::{Coord, Polygon};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use super::BoundaryError;
use crate::models::{Crs, GeoPoint};

const GEOGRAPHIC: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

/// Planar CRS picked for a point: the UTM zone it falls in
pub struct PlanarCrs {
    zone: u8,
    south: bool,
    geographic: Proj,
    planar: Proj,
}

impl PlanarCrs {
    /// UTM zone from longitude, hemisphere from latitude
    pub fn for_point(point: GeoPoint) -> Result<Self, BoundaryError> {
        let zone = utm_zone(point.longitude);
        let south = point.latitude < 0.0;

        let mut definition = format!(
            "+proj=utm +zone={} +ellps=WGS84 +datum=WGS84 +units=m +no_defs",
            zone
        );
        if south {
            definition.push_str(" +south");
        }

        Ok(Self {
            zone,
            south,
            geographic: parse_proj(GEOGRAPHIC)?,
            planar: parse_proj(&definition)?,
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn crs(&self) -> Crs {
        let base = if self.south { 32700 } else { 32600 };
        Crs::Epsg(base + u32::from(self.zone))
    }

    /// Geographic degrees to planar metres
    pub fn project_point(&self, point: GeoPoint) -> Result<Coord<f64>, BoundaryError> {
        let mut xyz = (point.longitude.to_radians(), point.latitude.to_radians(), 0.0);
        transform(&self.geographic, &self.planar, &mut xyz).map_err(projection_error)?;
        Ok(Coord { x: xyz.0, y: xyz.1 })
    }

    /// Planar metres back to geographic degrees
    pub fn unproject_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, BoundaryError> {
        let mut xyz = (coord.x, coord.y, 0.0);
        transform(&self.planar, &self.geographic, &mut xyz).map_err(projection_error)?;
        Ok(Coord {
            x: xyz.0.to_degrees(),
            y: xyz.1.to_degrees(),
        })
    }

    pub fn unproject_polygon(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>, BoundaryError> {
        polygon.try_map_coords(|c| self.unproject_coord(c))
    }
}

/// Zones are 6° wide starting at 180°W; 180°E folds into zone 60
pub fn utm_zone(longitude: f64) -> u8 {
    let zone = ((longitude + 180.0) / 6.0).floor() as i64 + 1;
    zone.clamp(1, 60) as u8
}

fn parse_proj(definition: &str) -> Result<Proj, BoundaryError> {
    Proj::from_proj_string(definition).map_err(projection_error)
}

fn projection_error(e: proj4rs::errors::Error) -> BoundaryError {
    BoundaryError::Projection {
        message: e.to_string(),
    }
}
