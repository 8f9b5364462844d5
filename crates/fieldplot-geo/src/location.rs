use fieldplot_core::models::{AreaLocation, Coordinate};
use fieldplot_core::ports::{BoundaryLookup, RegionResolver};

use crate::area::polygon_centroid;

/// Province and region of the area enclosed by `points`.
///
/// The centroid of the closed ring is tested against the boundaries; the
/// region comes from `regions` when a province matched. Fewer than three
/// points, or a centroid outside every boundary, gives an unknown location.
pub fn lookup_area_location(
    points: &[Coordinate],
    boundaries: &dyn BoundaryLookup,
    regions: Option<&dyn RegionResolver>,
) -> AreaLocation {
    let Some(centroid) = polygon_centroid(points) else {
        return AreaLocation::unknown();
    };

    let Some(province) = boundaries.province_at(centroid) else {
        tracing::debug!(
            latitude = centroid.latitude,
            longitude = centroid.longitude,
            "Centroid is outside every boundary"
        );
        return AreaLocation::unknown();
    };

    let region = regions.and_then(|table| table.region_for(&province));
    AreaLocation::new(Some(province), region)
}
