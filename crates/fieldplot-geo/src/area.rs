//! Area and centroid of a drawn polygon.

use fieldplot_core::models::{Coordinate, DEFAULT_COORDINATE_EPSILON};
use geo::algorithm::orient::{Direction, Orient};
use geo::{Centroid, GeodesicArea, Polygon};

use crate::conversion::{from_geo_point, to_line_string};
use crate::validation::validate_ring;

pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Copy of `points` ending exactly on its first point.
///
/// A last point within the default coordinate epsilon of the first already
/// closes the ring and is snapped onto it; otherwise the first is appended.
pub fn closed_ring(points: &[Coordinate]) -> Vec<Coordinate> {
    let mut ring = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if points.len() > 1 && last.approx_eq(first, DEFAULT_COORDINATE_EPSILON) {
            ring.pop();
        }
        ring.push(*first);
    }
    ring
}

fn to_polygon(points: &[Coordinate]) -> Option<Polygon> {
    let ring = closed_ring(points);
    let validation = validate_ring(&ring);
    if !validation.is_valid {
        tracing::warn!(
            reason = validation.first_reason().unwrap_or("invalid ring"),
            "Skipping geometry computation for invalid polygon"
        );
        return None;
    }
    Some(Polygon::new(to_line_string(&ring), vec![]))
}

/// Geodesic area of the polygon in hectares.
///
/// Returns 0 for fewer than three points and for rings that cannot be
/// measured; the latter is logged.
pub fn calculate_area_in_hectares(points: &[Coordinate]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let Some(polygon) = to_polygon(points) else {
        return 0.0;
    };

    // Clockwise rings would measure the rest of the globe.
    let square_meters = polygon.orient(Direction::Default).geodesic_area_unsigned();
    if !square_meters.is_finite() {
        tracing::warn!(points = points.len(), "Geodesic area is not finite, reporting 0 ha");
        return 0.0;
    }

    square_meters / SQUARE_METERS_PER_HECTARE
}

/// Area-weighted centroid of the polygon
pub fn polygon_centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.len() < 3 {
        return None;
    }

    to_polygon(points)?.centroid().map(from_geo_point)
}
