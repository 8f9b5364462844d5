//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! Overrides > Environment variables > Config file > Defaults

use fieldplot_core::config::{
    ClosedEditPolicy, ConfigOverrides, ConfigSource, EditSettings, LayeredConfig,
};
use fieldplot_core::PolygonEditor;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_KEYS: [&str; 6] = [
    "FIELDPLOT_COORDINATE_EPSILON",
    "FIELDPLOT_MARKER_TOLERANCE_M",
    "FIELDPLOT_EDGE_TOLERANCE_M",
    "FIELDPLOT_CLOSED_EDIT_POLICY",
    "FIELDPLOT_HISTORY_LIMIT",
    "FIELDPLOT_BOUNDARY_NAME_PROPERTY",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
marker_tolerance_m = 6.5
# Only override the marker tolerance, leave others as defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.marker_tolerance_m.value, 6.5);
    assert_eq!(config.marker_tolerance_m.source, ConfigSource::File);
    assert_eq!(config.edge_tolerance_m.value, 25.0);
    assert_eq!(config.edge_tolerance_m.source, ConfigSource::Default);
    assert_eq!(config.history_limit.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/fieldplot.toml");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("FIELDPLOT_EDGE_TOLERANCE_M", "12.5");
    env::set_var("FIELDPLOT_CLOSED_EDIT_POLICY", "reopenable");
    env::set_var("FIELDPLOT_BOUNDARY_NAME_PROPERTY", "PROVINSI");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
edge_tolerance_m = 40.0
closed_edit_policy = "reposition_only"
history_limit = 32
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.edge_tolerance_m.value, 12.5);
    assert_eq!(config.edge_tolerance_m.source, ConfigSource::Environment);
    assert_eq!(config.closed_edit_policy.value, ClosedEditPolicy::Reopenable);
    assert_eq!(config.boundary_name_property.value, "PROVINSI");
    // Only set in the file
    assert_eq!(config.history_limit.value, 32);
    assert_eq!(config.history_limit.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("FIELDPLOT_HISTORY_LIMIT", "many");
    env::set_var("FIELDPLOT_CLOSED_EDIT_POLICY", "sometimes");
    env::set_var("FIELDPLOT_COORDINATE_EPSILON", "tiny");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.history_limit.value, 128);
    assert_eq!(config.history_limit.source, ConfigSource::Default);
    assert_eq!(config.closed_edit_policy.source, ConfigSource::Default);
    assert_eq!(config.coordinate_epsilon.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_full_precedence_chain() {
    clear_env();
    env::set_var("FIELDPLOT_MARKER_TOLERANCE_M", "8");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "marker_tolerance_m = 7.0\nedge_tolerance_m = 30.0").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();
    config.apply_overrides(ConfigOverrides {
        marker_tolerance_m: Some(5.0),
        ..Default::default()
    });

    let settings = config.settings().unwrap();
    assert_eq!(settings.marker_tolerance_m, 5.0);
    assert_eq!(settings.edge_tolerance_m, 30.0);
    assert_eq!(settings.coordinate_epsilon, EditSettings::default().coordinate_epsilon);

    clear_env();
}

#[test]
fn test_settings_drive_editor_history_limit() {
    let mut config = LayeredConfig::with_defaults();
    config.apply_overrides(ConfigOverrides { history_limit: Some(2), ..Default::default() });
    let settings = config.settings().unwrap();

    let mut editor = PolygonEditor::with_settings(&settings);
    for i in 0..4 {
        editor.add_point(fieldplot_core::models::Coordinate::new(0.0, i as f64 * 0.001));
    }

    assert!(editor.undo().changed());
    assert!(editor.undo().changed());
    assert!(!editor.undo().changed());
    assert_eq!(editor.vertex_count(), 2);
}
