//! Canonical geometry types shared by the fieldplot crates.
//!
//! These types bridge GeoJSON serialization and the `geo` crate types used
//! for computation. Positions use GeoJSON axis order, `[longitude, latitude]`.

use serde::{Deserialize, Serialize};

use super::coordinate::{Coordinate, DEFAULT_COORDINATE_EPSILON};

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    #[default]
    Point,
    LineString,
    Polygon,
    MultiPolygon,
}

/// GeoJSON-compatible geometry representation
///
/// Only the geometry kinds that editing and boundary lookup deal with are
/// represented. Anything else fails to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(coordinate: Coordinate) -> Self {
        Geometry::Point { coordinates: coordinate.to_lon_lat() }
    }

    /// Create a LineString geometry from an open vertex path
    pub fn line_string(path: &[Coordinate]) -> Self {
        Geometry::LineString { coordinates: path.iter().map(Coordinate::to_lon_lat).collect() }
    }

    /// Create a single-ring Polygon, closing the ring if it is not closed yet.
    ///
    /// A last point within the default coordinate epsilon of the first is
    /// written as an exact copy of it.
    pub fn polygon_from_ring(ring: &[Coordinate]) -> Self {
        let mut positions: Vec<[f64; 2]> = ring.iter().map(Coordinate::to_lon_lat).collect();
        if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
            if ring.len() > 1 && last.approx_eq(first, DEFAULT_COORDINATE_EPSILON) {
                let end = positions.len() - 1;
                positions[end] = first.to_lon_lat();
            } else {
                positions.push(first.to_lon_lat());
            }
        }
        Geometry::Polygon { coordinates: vec![positions] }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// True for Polygon and MultiPolygon
    pub fn is_areal(&self) -> bool {
        matches!(self, Geometry::Polygon { .. } | Geometry::MultiPolygon { .. })
    }

    /// Try to parse from a serde_json::Value (GeoJSON)
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        Self::parse_geojson(value).ok()
    }

    /// Parse a GeoJSON geometry, reporting why it was not accepted.
    ///
    /// Altitude and any further ordinates are dropped from each position.
    pub fn parse_geojson(value: &serde_json::Value) -> serde_json::Result<Self> {
        let mut value = value.clone();
        if let Some(coordinates) = value.get_mut("coordinates") {
            drop_extra_ordinates(coordinates);
        }
        serde_json::from_value(value)
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Truncate every position below `value` to `[x, y]`
fn drop_extra_ordinates(value: &mut serde_json::Value) {
    let serde_json::Value::Array(items) = value else {
        return;
    };

    if items.len() > 2 && items.iter().all(serde_json::Value::is_number) {
        items.truncate(2);
    } else {
        items.iter_mut().for_each(drop_extra_ordinates);
    }
}
