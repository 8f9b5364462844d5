pub mod area;
pub mod coordinate;
pub mod geometry;

pub use area::AreaLocation;
pub use coordinate::{
    coordinate_equals, unique_vertex_count, AttachmentRef, Coordinate, VertexPoint,
    DEFAULT_COORDINATE_EPSILON,
};
pub use geometry::{Geometry, GeometryType};
