//! Coordinates and polygon vertices.
//!
//! Coordinates are WGS 84 latitude/longitude pairs in degrees. They are
//! compared with a tolerance rather than exact floating-point equality.

use serde::{Deserialize, Serialize};

/// Default tolerance for treating two coordinates as the same point.
///
/// 0.00001 degrees is roughly 1.11 m at the equator.
pub const DEFAULT_COORDINATE_EPSILON: f64 = 0.00001;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True if both axes differ by less than `epsilon` degrees
    pub fn approx_eq(&self, other: &Coordinate, epsilon: f64) -> bool {
        (self.latitude - other.latitude).abs() < epsilon
            && (self.longitude - other.longitude).abs() < epsilon
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// GeoJSON axis order: `[longitude, latitude]`
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn from_lon_lat(position: [f64; 2]) -> Self {
        Self::new(position[1], position[0])
    }
}

/// Tolerance-based coordinate equality
pub fn coordinate_equals(a: &Coordinate, b: &Coordinate, epsilon: f64) -> bool {
    a.approx_eq(b, epsilon)
}

/// Count coordinates that are distinct under `epsilon`.
///
/// A ring-closing duplicate of the first vertex is not counted.
pub fn unique_vertex_count(coordinates: &[Coordinate], epsilon: f64) -> usize {
    let mut unique: Vec<&Coordinate> = Vec::with_capacity(coordinates.len());
    for coordinate in coordinates {
        if !unique.iter().any(|seen| seen.approx_eq(coordinate, epsilon)) {
            unique.push(coordinate);
        }
    }
    unique.len()
}

/// Opaque reference to something attached to a vertex (a photo, usually).
///
/// The core never resolves it; storage is a collaborator concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentRef(pub String);

impl AttachmentRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A polygon vertex
///
/// The ring-closing vertex is always `Plain`: closing duplicates geometry,
/// never attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VertexPoint {
    Plain {
        coordinate: Coordinate,
    },
    Tagged {
        coordinate: Coordinate,
        attachment: AttachmentRef,
    },
}

impl VertexPoint {
    pub fn plain(coordinate: Coordinate) -> Self {
        VertexPoint::Plain { coordinate }
    }

    pub fn tagged(coordinate: Coordinate, attachment: AttachmentRef) -> Self {
        VertexPoint::Tagged { coordinate, attachment }
    }

    pub fn coordinate(&self) -> Coordinate {
        match self {
            VertexPoint::Plain { coordinate } | VertexPoint::Tagged { coordinate, .. } => {
                *coordinate
            }
        }
    }

    pub fn attachment(&self) -> Option<&AttachmentRef> {
        match self {
            VertexPoint::Plain { .. } => None,
            VertexPoint::Tagged { attachment, .. } => Some(attachment),
        }
    }

    /// Same vertex kind and attachment, new position
    pub fn moved_to(&self, coordinate: Coordinate) -> Self {
        match self {
            VertexPoint::Plain { .. } => VertexPoint::Plain { coordinate },
            VertexPoint::Tagged { attachment, .. } => {
                VertexPoint::Tagged { coordinate, attachment: attachment.clone() }
            }
        }
    }

    /// A geometric copy with any attachment stripped
    pub fn to_plain(&self) -> Self {
        VertexPoint::Plain { coordinate: self.coordinate() }
    }
}

impl From<Coordinate> for VertexPoint {
    fn from(coordinate: Coordinate) -> Self {
        VertexPoint::plain(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_within_epsilon() {
        let a = Coordinate::new(-8.5, 115.2);
        let b = Coordinate::new(-8.500005, 115.200005);
        assert!(coordinate_equals(&a, &b, DEFAULT_COORDINATE_EPSILON));
    }

    #[test]
    fn test_approx_eq_requires_both_axes() {
        let a = Coordinate::new(-8.5, 115.2);
        let b = Coordinate::new(-8.5, 115.2001);
        assert!(!coordinate_equals(&a, &b, DEFAULT_COORDINATE_EPSILON));
    }

    #[test]
    fn test_unique_vertex_count_ignores_closing_duplicate() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 0.001);
        let c = Coordinate::new(0.001, 0.001);
        let closing = Coordinate::new(0.000001, 0.0);

        assert_eq!(unique_vertex_count(&[a, b, c, closing], DEFAULT_COORDINATE_EPSILON), 3);
        assert_eq!(unique_vertex_count(&[], DEFAULT_COORDINATE_EPSILON), 0);
    }

    #[test]
    fn test_moved_to_keeps_attachment() {
        let photo = AttachmentRef::new("photos/plot-7.jpg");
        let vertex = VertexPoint::tagged(Coordinate::new(1.0, 2.0), photo.clone());

        let moved = vertex.moved_to(Coordinate::new(3.0, 4.0));
        assert_eq!(moved.coordinate(), Coordinate::new(3.0, 4.0));
        assert_eq!(moved.attachment(), Some(&photo));
        assert_eq!(moved.to_plain().attachment(), None);
    }

    #[test]
    fn test_vertex_serialization() {
        let vertex = VertexPoint::tagged(Coordinate::new(-8.5, 115.2), AttachmentRef::new("a.jpg"));
        let json = serde_json::to_string(&vertex).unwrap();
        assert!(json.contains("\"kind\":\"tagged\""));
        assert!(json.contains("a.jpg"));

        let parsed: VertexPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vertex);
    }
}
