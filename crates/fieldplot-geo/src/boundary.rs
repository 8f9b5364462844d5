//! Reference administrative boundaries for province lookup.
//!
//! Features are kept in dataset order. Lookups use an R-tree over feature
//! bounding boxes to find candidates, then test containment in dataset
//! order, so if features overlap the one listed first wins.

use std::fs;
use std::path::Path;

use fieldplot_core::error::{FieldplotError, Result};
use fieldplot_core::models::{Coordinate, Geometry};
use fieldplot_core::ports::BoundaryLookup;
use geo::{BoundingRect, Contains, MultiPolygon};
use rstar::{RTree, RTreeObject, AABB};

use crate::conversion::{to_geo_point, to_multi_polygon};
use crate::validation::validate_geometry;

/// A named administrative area
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    pub geometry: MultiPolygon,
}

impl BoundaryFeature {
    pub fn new(name: impl Into<String>, geometry: MultiPolygon) -> Self {
        Self { name: name.into(), geometry }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        self.geometry.contains(&to_geo_point(point))
    }
}

/// Bounding box of one feature, tagged with its position in the dataset
#[derive(Debug, Clone, PartialEq)]
struct FeatureEnvelope {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for FeatureEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Collection of boundary features with a bounding-box index
pub struct BoundaryDataset {
    features: Vec<BoundaryFeature>,
    tree: RTree<FeatureEnvelope>,
}

impl BoundaryDataset {
    /// Build a dataset from features in lookup priority order
    pub fn from_features(features: Vec<BoundaryFeature>) -> Self {
        let envelopes: Vec<FeatureEnvelope> = features
            .iter()
            .enumerate()
            .filter_map(|(position, feature)| {
                // Empty geometries have no bounding box and can never match.
                let rect = feature.geometry.bounding_rect()?;
                let min = rect.min();
                let max = rect.max();
                Some(FeatureEnvelope {
                    position,
                    envelope: AABB::from_corners([min.x, min.y], [max.x, max.y]),
                })
            })
            .collect();

        Self { features, tree: RTree::bulk_load(envelopes) }
    }

    /// Load a GeoJSON file, naming features by `name_property`
    pub fn from_path<P: AsRef<Path>>(path: P, name_property: &str) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FieldplotError::BoundaryDataset {
            path: path.to_path_buf(),
            reason: format!("Failed to read file: {}", e),
        })?;

        Self::from_geojson_str(&content, name_property).map_err(|e| {
            FieldplotError::BoundaryDataset { path: path.to_path_buf(), reason: e.to_string() }
        })
    }

    /// Parse a GeoJSON FeatureCollection (or single Feature).
    ///
    /// Features without a usable name or without valid Polygon/MultiPolygon
    /// geometry are skipped with a warning.
    pub fn from_geojson_str(content: &str, name_property: &str) -> Result<Self> {
        let geojson: geojson::GeoJson = content
            .parse()
            .map_err(|e| FieldplotError::Serialization(format!("Failed to parse GeoJSON: {}", e)))?;

        let raw_features = match geojson {
            geojson::GeoJson::FeatureCollection(fc) => fc.features,
            geojson::GeoJson::Feature(feature) => vec![feature],
            geojson::GeoJson::Geometry(_) => {
                return Err(FieldplotError::Serialization(
                    "Boundary dataset must contain features, found a bare geometry".to_string(),
                ))
            }
        };

        let total = raw_features.len();
        let features: Vec<BoundaryFeature> = raw_features
            .iter()
            .enumerate()
            .filter_map(|(idx, feature)| match convert_feature(feature, idx, name_property) {
                Ok(converted) => Some(converted),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping boundary feature");
                    None
                }
            })
            .collect();

        tracing::info!(loaded = features.len(), total, "Loaded boundary dataset");
        Ok(Self::from_features(features))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// First feature, in dataset order, that contains `point`
    pub fn find_containing(&self, point: Coordinate) -> Option<&BoundaryFeature> {
        let query = AABB::from_point([point.longitude, point.latitude]);
        let mut candidates: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .map(|entry| entry.position)
            .collect();
        candidates.sort_unstable();

        candidates
            .into_iter()
            .map(|position| &self.features[position])
            .find(|feature| feature.contains(point))
    }
}

impl BoundaryLookup for BoundaryDataset {
    fn province_at(&self, point: Coordinate) -> Option<String> {
        self.find_containing(point).map(|feature| feature.name.clone())
    }
}

/// Convert a GeoJSON feature into a boundary feature
fn convert_feature(
    feature: &geojson::Feature,
    idx: usize,
    name_property: &str,
) -> Result<BoundaryFeature> {
    let feature_id = feature
        .id
        .as_ref()
        .map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        })
        .unwrap_or_else(|| idx.to_string());

    let invalid = |reason: String| FieldplotError::InvalidGeometry {
        feature_id: feature_id.clone(),
        reason,
    };

    let name = feature
        .properties
        .as_ref()
        .and_then(|props| props.get(name_property))
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| invalid(format!("missing '{}' property", name_property)))?;

    let geometry_json = feature
        .geometry
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| FieldplotError::Serialization(format!("Failed to serialize geometry: {}", e)))?
        .ok_or_else(|| invalid("feature has no geometry".to_string()))?;

    let geometry = Geometry::parse_geojson(&geometry_json)
        .map_err(|e| invalid(format!("unsupported geometry: {}", e)))?;
    if !geometry.is_areal() {
        return Err(invalid(format!(
            "geometry is a {:?}, not a Polygon or MultiPolygon",
            geometry.geometry_type()
        )));
    }

    let validation = validate_geometry(&geometry);
    if !validation.is_valid {
        return Err(invalid(validation.first_reason().unwrap_or("invalid geometry").to_string()));
    }

    let multi_polygon = to_multi_polygon(&geometry)
        .ok_or_else(|| invalid("geometry is not a Polygon or MultiPolygon".to_string()))?;

    Ok(BoundaryFeature::new(name, multi_polygon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]])
    }

    #[test]
    fn test_find_containing() {
        let dataset = BoundaryDataset::from_features(vec![
            BoundaryFeature::new("West", square(0.0, 0.0, 1.0)),
            BoundaryFeature::new("East", square(1.0, 0.0, 1.0)),
        ]);

        let inside_east = Coordinate::new(0.5, 1.5);
        assert_eq!(dataset.province_at(inside_east).as_deref(), Some("East"));
        assert!(dataset.province_at(Coordinate::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_overlap_prefers_dataset_order() {
        let dataset = BoundaryDataset::from_features(vec![
            BoundaryFeature::new("Small", square(0.4, 0.4, 0.2)),
            BoundaryFeature::new("Large", square(0.0, 0.0, 1.0)),
        ]);

        assert_eq!(dataset.province_at(Coordinate::new(0.5, 0.5)).as_deref(), Some("Small"));
        assert_eq!(dataset.province_at(Coordinate::new(0.1, 0.1)).as_deref(), Some("Large"));
    }

    #[test]
    fn test_from_geojson_skips_unusable_features() {
        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Bali" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[114.4, -8.9], [115.8, -8.9], [115.8, -8.0], [114.4, -8.0], [114.4, -8.9]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Somewhere" },
                    "geometry": { "type": "Point", "coordinates": [110.0, -7.0] }
                },
                {
                    "type": "Feature",
                    "properties": { "code": "NTB" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[115.8, -9.1], [119.3, -9.1], [119.3, -8.0], [115.8, -8.0], [115.8, -9.1]]]
                    }
                }
            ]
        }"#;

        let dataset = BoundaryDataset::from_geojson_str(content, "name").unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.features()[0].name, "Bali");
        assert_eq!(
            dataset.province_at(Coordinate::new(-8.5, 115.2)).as_deref(),
            Some("Bali")
        );
    }

    #[test]
    fn test_positions_with_altitude_are_accepted() {
        let content = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "name": "Bali" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[114.4, -8.9, 0.0], [115.8, -8.9, 0.0], [115.8, -8.0, 0.0], [114.4, -8.0, 0.0], [114.4, -8.9, 0.0]]]
                }
            }]
        }"#;

        let dataset = BoundaryDataset::from_geojson_str(content, "name").unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.province_at(Coordinate::new(-8.5, 115.2)).as_deref(), Some("Bali"));
    }

    #[test]
    fn test_skip_reason_names_the_geometry_problem() {
        let feature = |geometry: serde_json::Value| -> geojson::Feature {
            serde_json::from_value(serde_json::json!({
                "type": "Feature",
                "properties": { "name": "Somewhere" },
                "geometry": geometry
            }))
            .unwrap()
        };

        let point = feature(serde_json::json!({ "type": "Point", "coordinates": [110.0, -7.0] }));
        let reason = convert_feature(&point, 0, "name").unwrap_err().to_string();
        assert!(reason.contains("Point"), "{}", reason);

        let points = feature(serde_json::json!({
            "type": "MultiPoint",
            "coordinates": [[110.0, -7.0], [110.5, -7.5]]
        }));
        let reason = convert_feature(&points, 1, "name").unwrap_err().to_string();
        assert!(reason.contains("unsupported geometry"), "{}", reason);
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let content = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        assert!(BoundaryDataset::from_geojson_str(content, "name").is_err());
        assert!(BoundaryDataset::from_geojson_str("not json", "name").is_err());
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = BoundaryDataset::from_features(Vec::new());
        assert!(dataset.is_empty());
        assert!(dataset.province_at(Coordinate::new(0.0, 0.0)).is_none());
    }
}
