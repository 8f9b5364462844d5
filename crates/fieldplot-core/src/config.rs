use crate::error::{FieldplotError, Result};
use crate::models::DEFAULT_COORDINATE_EPSILON;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// What the editing façade allows once a shape has been closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClosedEditPolicy {
    /// Closed shapes can only have vertices dragged (new-area flow)
    #[default]
    RepositionOnly,
    /// Closed shapes can also lose vertices or be reopened (existing-area flow)
    Reopenable,
}

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Set programmatically by the embedding application
    Override,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Override => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Validated settings consumed by the editor and the session façade
#[derive(Debug, Clone, PartialEq)]
pub struct EditSettings {
    /// Degrees below which two coordinates are the same point
    pub coordinate_epsilon: f64,
    /// Taps closer than this to a vertex belong to that vertex
    pub marker_tolerance_m: f64,
    /// Taps closer than this to an edge insert into that edge
    pub edge_tolerance_m: f64,
    pub closed_edit_policy: ClosedEditPolicy,
    /// Maximum number of undo snapshots kept
    pub history_limit: usize,
    /// Feature property holding a boundary's display name
    pub boundary_name_property: String,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            coordinate_epsilon: DEFAULT_COORDINATE_EPSILON,
            marker_tolerance_m: 10.0,
            edge_tolerance_m: 25.0,
            closed_edit_policy: ClosedEditPolicy::RepositionOnly,
            history_limit: 128,
            boundary_name_property: "name".to_string(),
        }
    }
}

/// Layered configuration for Fieldplot
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub coordinate_epsilon: ConfigValue<f64>,
    pub marker_tolerance_m: ConfigValue<f64>,
    pub edge_tolerance_m: ConfigValue<f64>,
    pub closed_edit_policy: ConfigValue<ClosedEditPolicy>,
    pub history_limit: ConfigValue<usize>,
    pub boundary_name_property: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let defaults = EditSettings::default();
        Self {
            coordinate_epsilon: ConfigValue::new(defaults.coordinate_epsilon, ConfigSource::Default),
            marker_tolerance_m: ConfigValue::new(defaults.marker_tolerance_m, ConfigSource::Default),
            edge_tolerance_m: ConfigValue::new(defaults.edge_tolerance_m, ConfigSource::Default),
            closed_edit_policy: ConfigValue::new(defaults.closed_edit_policy, ConfigSource::Default),
            history_limit: ConfigValue::new(defaults.history_limit, ConfigSource::Default),
            boundary_name_property: ConfigValue::new(
                defaults.boundary_name_property,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FieldplotError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FieldplotError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(epsilon) = file_config.coordinate_epsilon {
            self.coordinate_epsilon.update(epsilon, ConfigSource::File);
        }

        if let Some(tolerance) = file_config.marker_tolerance_m {
            self.marker_tolerance_m.update(tolerance, ConfigSource::File);
        }

        if let Some(tolerance) = file_config.edge_tolerance_m {
            self.edge_tolerance_m.update(tolerance, ConfigSource::File);
        }

        if let Some(policy) = file_config.closed_edit_policy {
            self.closed_edit_policy.update(policy, ConfigSource::File);
        }

        if let Some(limit) = file_config.history_limit {
            self.history_limit.update(limit, ConfigSource::File);
        }

        if let Some(property) = file_config.boundary_name_property {
            self.boundary_name_property.update(property, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // FIELDPLOT_COORDINATE_EPSILON
        if let Ok(raw) = env::var("FIELDPLOT_COORDINATE_EPSILON") {
            match raw.parse::<f64>() {
                Ok(epsilon) => self.coordinate_epsilon.update(epsilon, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDPLOT_COORDINATE_EPSILON value '{}': expected degrees as a number",
                    raw
                ),
            }
        }

        // FIELDPLOT_MARKER_TOLERANCE_M
        if let Ok(raw) = env::var("FIELDPLOT_MARKER_TOLERANCE_M") {
            match raw.parse::<f64>() {
                Ok(tolerance) => self.marker_tolerance_m.update(tolerance, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDPLOT_MARKER_TOLERANCE_M value '{}': expected meters as a number",
                    raw
                ),
            }
        }

        // FIELDPLOT_EDGE_TOLERANCE_M
        if let Ok(raw) = env::var("FIELDPLOT_EDGE_TOLERANCE_M") {
            match raw.parse::<f64>() {
                Ok(tolerance) => self.edge_tolerance_m.update(tolerance, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDPLOT_EDGE_TOLERANCE_M value '{}': expected meters as a number",
                    raw
                ),
            }
        }

        // FIELDPLOT_CLOSED_EDIT_POLICY
        if let Ok(raw) = env::var("FIELDPLOT_CLOSED_EDIT_POLICY") {
            match parse_closed_edit_policy(&raw) {
                Ok(policy) => self.closed_edit_policy.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDPLOT_CLOSED_EDIT_POLICY value '{}': expected reposition_only or reopenable",
                    raw
                ),
            }
        }

        // FIELDPLOT_HISTORY_LIMIT
        if let Ok(raw) = env::var("FIELDPLOT_HISTORY_LIMIT") {
            match raw.parse::<usize>() {
                Ok(limit) => self.history_limit.update(limit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDPLOT_HISTORY_LIMIT value '{}': expected a positive integer",
                    raw
                ),
            }
        }

        // FIELDPLOT_BOUNDARY_NAME_PROPERTY
        if let Ok(property) = env::var("FIELDPLOT_BOUNDARY_NAME_PROPERTY") {
            self.boundary_name_property.update(property, ConfigSource::Environment);
        }

        self
    }

    /// Apply programmatic overrides from the embedding application
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(epsilon) = overrides.coordinate_epsilon {
            self.coordinate_epsilon.update(epsilon, ConfigSource::Override);
        }

        if let Some(tolerance) = overrides.marker_tolerance_m {
            self.marker_tolerance_m.update(tolerance, ConfigSource::Override);
        }

        if let Some(tolerance) = overrides.edge_tolerance_m {
            self.edge_tolerance_m.update(tolerance, ConfigSource::Override);
        }

        if let Some(policy) = overrides.closed_edit_policy {
            self.closed_edit_policy.update(policy, ConfigSource::Override);
        }

        if let Some(limit) = overrides.history_limit {
            self.history_limit.update(limit, ConfigSource::Override);
        }

        if let Some(property) = overrides.boundary_name_property {
            self.boundary_name_property.update(property, ConfigSource::Override);
        }
    }

    /// Validate the merged values and produce the settings used at runtime
    pub fn settings(&self) -> Result<EditSettings> {
        require_positive("coordinate_epsilon", self.coordinate_epsilon.value)?;
        require_positive("marker_tolerance_m", self.marker_tolerance_m.value)?;
        require_positive("edge_tolerance_m", self.edge_tolerance_m.value)?;

        if self.history_limit.value == 0 {
            return Err(FieldplotError::ConfigInvalid {
                key: "history_limit".to_string(),
                reason: "history_limit must be at least 1".to_string(),
            });
        }

        let property = self.boundary_name_property.value.trim();
        if property.is_empty() {
            return Err(FieldplotError::ConfigMissing { key: "boundary_name_property".to_string() });
        }

        Ok(EditSettings {
            coordinate_epsilon: self.coordinate_epsilon.value,
            marker_tolerance_m: self.marker_tolerance_m.value,
            edge_tolerance_m: self.edge_tolerance_m.value,
            closed_edit_policy: self.closed_edit_policy.value,
            history_limit: self.history_limit.value,
            boundary_name_property: property.to_string(),
        })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "coordinate_epsilon".to_string(),
            (self.coordinate_epsilon.value.to_string(), self.coordinate_epsilon.source),
        );

        map.insert(
            "marker_tolerance_m".to_string(),
            (format!("{} m", self.marker_tolerance_m.value), self.marker_tolerance_m.source),
        );

        map.insert(
            "edge_tolerance_m".to_string(),
            (format!("{} m", self.edge_tolerance_m.value), self.edge_tolerance_m.source),
        );

        map.insert(
            "closed_edit_policy".to_string(),
            (format!("{:?}", self.closed_edit_policy.value), self.closed_edit_policy.source),
        );

        map.insert(
            "history_limit".to_string(),
            (self.history_limit.value.to_string(), self.history_limit.source),
        );

        map.insert(
            "boundary_name_property".to_string(),
            (self.boundary_name_property.value.clone(), self.boundary_name_property.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    coordinate_epsilon: Option<f64>,
    marker_tolerance_m: Option<f64>,
    edge_tolerance_m: Option<f64>,
    closed_edit_policy: Option<ClosedEditPolicy>,
    history_limit: Option<usize>,
    boundary_name_property: Option<String>,
}

/// Programmatic configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub coordinate_epsilon: Option<f64>,
    pub marker_tolerance_m: Option<f64>,
    pub edge_tolerance_m: Option<f64>,
    pub closed_edit_policy: Option<ClosedEditPolicy>,
    pub history_limit: Option<usize>,
    pub boundary_name_property: Option<String>,
}

/// Parse closed-edit policy from string
pub fn parse_closed_edit_policy(s: &str) -> Result<ClosedEditPolicy> {
    match s.trim().to_lowercase().replace('-', "_").as_str() {
        "reposition_only" | "reposition" => Ok(ClosedEditPolicy::RepositionOnly),
        "reopenable" | "reopen" => Ok(ClosedEditPolicy::Reopenable),
        _ => Err(FieldplotError::ConfigInvalid {
            key: "closed_edit_policy".to_string(),
            reason: format!("Invalid closed edit policy: {}. Use reposition_only or reopenable", s),
        }),
    }
}

fn require_positive(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FieldplotError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("{} must be a finite number greater than zero, got {}", key, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.coordinate_epsilon.value, 0.00001);
        assert_eq!(config.coordinate_epsilon.source, ConfigSource::Default);
        assert_eq!(config.closed_edit_policy.value, ClosedEditPolicy::RepositionOnly);
        assert_eq!(config.history_limit.value, 128);
        assert_eq!(config.settings().unwrap(), EditSettings::default());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // Overrides beat everything
        value.update(400, ConfigSource::Override);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Override);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Override);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
edge_tolerance_m = 40.0
closed_edit_policy = "reopenable"
history_limit = 16
boundary_name_property = "PROVINSI"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.edge_tolerance_m.value, 40.0);
        assert_eq!(config.edge_tolerance_m.source, ConfigSource::File);
        assert_eq!(config.closed_edit_policy.value, ClosedEditPolicy::Reopenable);
        assert_eq!(config.history_limit.value, 16);
        assert_eq!(config.boundary_name_property.value, "PROVINSI");
        assert_eq!(config.marker_tolerance_m.source, ConfigSource::Default);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "history_limit = \"lots\"").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, FieldplotError::ConfigInvalid { ref key, .. } if key == "file"));
    }

    #[test]
    fn test_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.apply_overrides(ConfigOverrides {
            marker_tolerance_m: Some(4.0),
            closed_edit_policy: Some(ClosedEditPolicy::Reopenable),
            ..Default::default()
        });

        assert_eq!(config.marker_tolerance_m.value, 4.0);
        assert_eq!(config.marker_tolerance_m.source, ConfigSource::Override);
        assert_eq!(config.closed_edit_policy.source, ConfigSource::Override);
        assert_eq!(config.edge_tolerance_m.source, ConfigSource::Default);
    }

    #[test]
    fn test_settings_rejects_non_positive_tolerance() {
        let mut config = LayeredConfig::with_defaults();
        config.apply_overrides(ConfigOverrides {
            edge_tolerance_m: Some(0.0),
            ..Default::default()
        });

        let err = config.settings().unwrap_err();
        assert!(
            matches!(err, FieldplotError::ConfigInvalid { ref key, .. } if key == "edge_tolerance_m")
        );
    }

    #[test]
    fn test_settings_rejects_empty_history_and_name() {
        let mut config = LayeredConfig::with_defaults();
        config.apply_overrides(ConfigOverrides { history_limit: Some(0), ..Default::default() });
        assert!(config.settings().is_err());

        let mut config = LayeredConfig::with_defaults();
        config.apply_overrides(ConfigOverrides {
            boundary_name_property: Some("  ".to_string()),
            ..Default::default()
        });
        assert!(matches!(config.settings(), Err(FieldplotError::ConfigMissing { .. })));
    }

    #[test]
    fn test_parse_closed_edit_policy() {
        assert_eq!(
            parse_closed_edit_policy("reposition_only").unwrap(),
            ClosedEditPolicy::RepositionOnly
        );
        assert_eq!(parse_closed_edit_policy("Reopenable").unwrap(), ClosedEditPolicy::Reopenable);
        assert_eq!(
            parse_closed_edit_policy("reposition-only").unwrap(),
            ClosedEditPolicy::RepositionOnly
        );
        assert!(parse_closed_edit_policy("whatever").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert_eq!(map.len(), 6);
        let (edge, source) = &map["edge_tolerance_m"];
        assert_eq!(edge, "25 m");
        assert_eq!(*source, ConfigSource::Default);
    }
}
