//! Shape construction in planar coordinates.

use std::f64::consts::PI;

use geo::Rotate;
use geo_types::{Coord, LineString, Polygon};

/// Segments per quarter circle
pub const QUADRANT_SEGMENTS: usize = 16;

/// Disc approximated by a closed ring of `4 * QUADRANT_SEGMENTS` edges
pub fn circle(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    let segments = 4 * QUADRANT_SEGMENTS;
    let mut ring: Vec<Coord<f64>> = (0..segments)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / segments as f64;
            Coord {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect();
    ring.push(ring[0]);

    Polygon::new(LineString::new(ring), vec![])
}

/// Square of half-width `half_width`, rotated counter-clockwise about its centroid
pub fn square(center: Coord<f64>, half_width: f64, rotation_degrees: f64) -> Polygon<f64> {
    let (x, y, r) = (center.x, center.y, half_width);
    let square = Polygon::new(
        LineString::from(vec![
            (x - r, y - r),
            (x + r, y - r),
            (x + r, y + r),
            (x - r, y + r),
            (x - r, y - r),
        ]),
        vec![],
    );

    if rotation_degrees == 0.0 {
        square
    } else {
        square.rotate_around_centroid(rotation_degrees)
    }
}
