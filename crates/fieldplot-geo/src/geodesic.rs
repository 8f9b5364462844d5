//! Geodesic hit testing for taps on the map.
//!
//! All tolerances are in meters. Nearest points on edges are computed on the
//! great circle through the edge's endpoints, so results hold at any latitude.

use fieldplot_core::models::Coordinate;
use geo::{Distance, Haversine};

use crate::conversion::to_geo_point;

/// The edge a tap should be inserted into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Index at which inserting the tap splits the edge
    pub insertion_index: usize,
    /// Distance from the tap to the edge in meters
    pub distance_m: f64,
}

/// Great-circle distance between two coordinates in meters
pub fn geodesic_distance(a: Coordinate, b: Coordinate) -> f64 {
    Haversine.distance(to_geo_point(a), to_geo_point(b))
}

/// True if `tap` is within `tolerance_m` of any existing vertex
pub fn is_tap_near_existing_marker(tap: Coordinate, points: &[Coordinate], tolerance_m: f64) -> bool {
    points.iter().any(|point| geodesic_distance(tap, *point) < tolerance_m)
}

/// Find the edge closest to `tap`, if it is closer than `max_distance_m`.
///
/// Every consecutive pair of points is an edge; pass a closed ring to include
/// the closing edge. Ties go to the earlier edge.
pub fn find_closest_segment_for_insertion(
    tap: Coordinate,
    points: &[Coordinate],
    max_distance_m: f64,
) -> Option<SegmentHit> {
    let mut best: Option<SegmentHit> = None;

    for (i, edge) in points.windows(2).enumerate() {
        let closest = closest_point_on_segment(tap, edge[0], edge[1]);
        let distance_m = geodesic_distance(tap, closest);

        if best.map_or(true, |hit| distance_m < hit.distance_m) {
            best = Some(SegmentHit { insertion_index: i + 1, distance_m });
        }
    }

    best.filter(|hit| hit.distance_m < max_distance_m)
}

/// Nearest point to `p` on the great-circle arc from `a` to `b`.
///
/// The projection onto the great circle is clamped to the arc, so the result
/// is `a` or `b` when the foot of the perpendicular falls outside the edge.
pub fn closest_point_on_segment(p: Coordinate, a: Coordinate, b: Coordinate) -> Coordinate {
    let va = to_unit_vector(a);
    let vb = to_unit_vector(b);
    let vp = to_unit_vector(p);

    let nearer_endpoint = || {
        if geodesic_distance(p, a) <= geodesic_distance(p, b) {
            a
        } else {
            b
        }
    };

    // Degenerate edge (coincident or antipodal endpoints)
    let Some(normal) = normalize(cross(va, vb)) else {
        return nearer_endpoint();
    };

    let offset = dot(vp, normal);
    let projected = [
        vp[0] - offset * normal[0],
        vp[1] - offset * normal[1],
        vp[2] - offset * normal[2],
    ];

    // p is a pole of the edge's great circle; every point is equally far.
    let Some(projected) = normalize(projected) else {
        return a;
    };

    let after_a = dot(cross(va, projected), normal) >= 0.0;
    let before_b = dot(cross(projected, vb), normal) >= 0.0;

    if after_a && before_b {
        from_unit_vector(projected)
    } else {
        nearer_endpoint()
    }
}

fn to_unit_vector(coordinate: Coordinate) -> [f64; 3] {
    let lat = coordinate.latitude.to_radians();
    let lon = coordinate.longitude.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn from_unit_vector(v: [f64; 3]) -> Coordinate {
    let lat = v[2].atan2((v[0] * v[0] + v[1] * v[1]).sqrt());
    let lon = v[1].atan2(v[0]);
    Coordinate::new(lat.to_degrees(), lon.to_degrees())
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize(v: [f64; 3]) -> Option<[f64; 3]> {
    let length = dot(v, v).sqrt();
    if length < 1e-15 {
        None
    } else {
        Some([v[0] / length, v[1] / length, v[2] / length])
    }
}
