use fieldplot_core::models::{AreaLocation, Coordinate, Geometry, VertexPoint};
use serde::{Deserialize, Serialize};

/// A closed area ready for submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSummary {
    /// Ring vertices, ending with the closing vertex
    pub vertices: Vec<VertexPoint>,
    pub hectares: f64,
    pub centroid: Option<Coordinate>,
    pub location: AreaLocation,
}

impl AreaSummary {
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.vertices.iter().map(VertexPoint::coordinate).collect()
    }

    /// GeoJSON Polygon of the ring
    pub fn to_geometry(&self) -> Geometry {
        Geometry::polygon_from_ring(&self.coordinates())
    }
}
