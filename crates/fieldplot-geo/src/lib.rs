//! Fieldplot Geo - Geometry utilities for polygon editing
//!
//! Geodesic hit testing and segment insertion, area and centroid of a drawn
//! polygon, and province/region lookup against administrative boundaries.

pub mod area;
pub mod boundary;
pub mod conversion;
pub mod geodesic;
pub mod location;
pub mod region;
pub mod validation;

// Re-export key types for convenience
pub use area::{calculate_area_in_hectares, closed_ring, polygon_centroid, SQUARE_METERS_PER_HECTARE};
pub use boundary::{BoundaryDataset, BoundaryFeature};
pub use fieldplot_core::models::coordinate_equals;
pub use geodesic::{
    closest_point_on_segment, find_closest_segment_for_insertion, geodesic_distance,
    is_tap_near_existing_marker, SegmentHit,
};
pub use location::lookup_area_location;
pub use region::RegionTable;
pub use validation::{validate_geometry, validate_ring, ValidationError, ValidationResult};
