//! Integration tests for loading reference datasets from disk and resolving
//! the location of a drawn area.

use fieldplot_core::error::FieldplotError;
use fieldplot_core::models::Coordinate;
use fieldplot_geo::{
    calculate_area_in_hectares, lookup_area_location, BoundaryDataset, RegionTable,
};
use std::fs;
use tempfile::TempDir;

const PROVINCES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "id": "ID-BA",
            "properties": { "PROVINSI": "Bali" },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[114.4, -8.9], [115.8, -8.9], [115.8, -8.0], [114.4, -8.0], [114.4, -8.9]]],
                    [[[115.4, -8.85], [115.65, -8.85], [115.65, -8.65], [115.4, -8.65], [115.4, -8.85]]]
                ]
            }
        },
        {
            "type": "Feature",
            "id": "ID-NB",
            "properties": { "PROVINSI": "Nusa Tenggara Barat" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[115.8, -9.1], [119.3, -9.1], [119.3, -8.0], [115.8, -8.0], [115.8, -9.1]]]
            }
        }
    ]
}"#;

fn lombok_plot() -> Vec<Coordinate> {
    vec![
        Coordinate::new(-8.600, 116.300),
        Coordinate::new(-8.600, 116.305),
        Coordinate::new(-8.605, 116.305),
        Coordinate::new(-8.605, 116.300),
    ]
}

#[test]
fn test_resolve_location_from_files() {
    let temp_dir = TempDir::new().unwrap();
    let boundaries_path = temp_dir.path().join("provinces.geojson");
    let regions_path = temp_dir.path().join("regions.json");
    fs::write(&boundaries_path, PROVINCES).unwrap();
    fs::write(&regions_path, r#"{ "Bali": "Bali Nusra", "Nusa Tenggara Barat": "Bali Nusra" }"#)
        .unwrap();

    let boundaries = BoundaryDataset::from_path(&boundaries_path, "PROVINSI").unwrap();
    let regions = RegionTable::from_path(&regions_path).unwrap();
    assert_eq!(boundaries.len(), 2);

    let location = lookup_area_location(&lombok_plot(), &boundaries, Some(&regions));
    assert_eq!(location.province.as_deref(), Some("Nusa Tenggara Barat"));
    assert_eq!(location.region.as_deref(), Some("Bali Nusra"));

    let hectares = calculate_area_in_hectares(&lombok_plot());
    assert!(hectares > 25.0 && hectares < 35.0, "got {} ha", hectares);
}

#[test]
fn test_wrong_name_property_loads_nothing() {
    let boundaries = BoundaryDataset::from_geojson_str(PROVINCES, "name").unwrap();
    assert!(boundaries.is_empty());
    assert!(!lookup_area_location(&lombok_plot(), &boundaries, None).is_known());
}

#[test]
fn test_missing_boundary_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.geojson");

    match BoundaryDataset::from_path(&missing, "name") {
        Err(FieldplotError::BoundaryDataset { path, .. }) => assert_eq!(path, missing),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("loading a missing file should fail"),
    }
}

#[test]
fn test_malformed_boundary_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.geojson");
    fs::write(&path, "{ not geojson").unwrap();

    assert!(matches!(
        BoundaryDataset::from_path(&path, "name"),
        Err(FieldplotError::BoundaryDataset { .. })
    ));
}

#[test]
fn test_missing_region_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = RegionTable::from_path(temp_dir.path().join("nope.json"));
    assert!(matches!(result, Err(FieldplotError::Io(_))));
}
