//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

use std::sync::Arc;

use crate::models::Coordinate;

/// Port for point-in-polygon lookup against administrative boundaries
pub trait BoundaryLookup {
    /// Name of the first boundary feature containing `point`, if any
    fn province_at(&self, point: Coordinate) -> Option<String>;
}

/// Port for resolving a region from a province name
pub trait RegionResolver {
    fn region_for(&self, province: &str) -> Option<String>;
}

impl<T: BoundaryLookup + ?Sized> BoundaryLookup for &T {
    fn province_at(&self, point: Coordinate) -> Option<String> {
        (**self).province_at(point)
    }
}

impl<T: BoundaryLookup + ?Sized> BoundaryLookup for Arc<T> {
    fn province_at(&self, point: Coordinate) -> Option<String> {
        (**self).province_at(point)
    }
}

impl<T: RegionResolver + ?Sized> RegionResolver for &T {
    fn region_for(&self, province: &str) -> Option<String> {
        (**self).region_for(province)
    }
}

impl<T: RegionResolver + ?Sized> RegionResolver for Arc<T> {
    fn region_for(&self, province: &str) -> Option<String> {
        (**self).region_for(province)
    }
}
