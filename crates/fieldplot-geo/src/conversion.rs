//! Conversions between fieldplot models and `geo` crate types.

use fieldplot_core::models::{Coordinate, Geometry};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};

/// Convert a coordinate to a geo::Point (x = longitude, y = latitude)
pub fn to_geo_point(coordinate: Coordinate) -> Point {
    Point::new(coordinate.longitude, coordinate.latitude)
}

pub fn from_geo_point(point: Point) -> Coordinate {
    Coordinate::new(point.y(), point.x())
}

/// Convert a ring of coordinates to a geo::LineString, as given
pub fn to_line_string(ring: &[Coordinate]) -> LineString {
    let coords: Vec<Coord> =
        ring.iter().map(|c| Coord { x: c.longitude, y: c.latitude }).collect();
    LineString::new(coords)
}

fn rings_to_polygon(rings: &[Vec<[f64; 2]>]) -> Polygon {
    let mut rings: Vec<LineString> = rings
        .iter()
        .map(|ring| {
            let coords: Vec<Coord> = ring.iter().map(|c| Coord { x: c[0], y: c[1] }).collect();
            LineString::new(coords)
        })
        .collect();

    if rings.is_empty() {
        Polygon::new(LineString::new(vec![]), vec![])
    } else {
        let exterior = rings.remove(0);
        Polygon::new(exterior, rings)
    }
}

/// Convert an areal canonical geometry to a geo::MultiPolygon
///
/// Returns `None` for points and line strings.
pub fn to_multi_polygon(geometry: &Geometry) -> Option<MultiPolygon> {
    match geometry {
        Geometry::Polygon { coordinates } => {
            Some(MultiPolygon::new(vec![rings_to_polygon(coordinates)]))
        }
        Geometry::MultiPolygon { coordinates } => Some(MultiPolygon::new(
            coordinates.iter().map(|polygon| rings_to_polygon(polygon)).collect(),
        )),
        Geometry::Point { .. } | Geometry::LineString { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_axis_order() {
        let coordinate = Coordinate::new(-8.5, 115.2);
        let point = to_geo_point(coordinate);
        assert_eq!(point.x(), 115.2);
        assert_eq!(point.y(), -8.5);
        assert_eq!(from_geo_point(point), coordinate);
    }

    #[test]
    fn test_polygon_with_hole() {
        let geometry = Geometry::Polygon {
            coordinates: vec![
                vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                vec![[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]],
            ],
        };

        let multi = to_multi_polygon(&geometry).unwrap();
        assert_eq!(multi.0.len(), 1);
        assert_eq!(multi.0[0].interiors().len(), 1);
    }

    #[test]
    fn test_non_areal_geometry() {
        assert!(to_multi_polygon(&Geometry::point(Coordinate::new(0.0, 0.0))).is_none());
    }
}
