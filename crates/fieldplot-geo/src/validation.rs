use fieldplot_core::models::{Coordinate, Geometry, DEFAULT_COORDINATE_EPSILON};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// First error reason, for logging
    pub fn first_reason(&self) -> Option<&str> {
        self.errors.first().map(|e| e.reason.as_str())
    }

    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason);
        }
    }
}

/// Validate a closed ring of coordinates
pub fn validate_ring(ring: &[Coordinate]) -> ValidationResult {
    let positions: Vec<[f64; 2]> = ring.iter().map(Coordinate::to_lon_lat).collect();
    validate_positions("Ring", &positions)
}

/// Validate an areal geometry (Polygon or MultiPolygon)
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Polygon { coordinates } => validate_polygon(coordinates),
        Geometry::MultiPolygon { coordinates } => {
            let mut result = ValidationResult::valid();
            if coordinates.is_empty() {
                result.add_error(
                    "MultiPolygon".to_string(),
                    "MultiPolygon must contain at least one polygon".to_string(),
                );
            }
            for (i, polygon) in coordinates.iter().enumerate() {
                result.absorb(&format!("MultiPolygon[{}]", i), validate_polygon(polygon));
            }
            result
        }
        other => {
            let mut result = ValidationResult::valid();
            result.add_error(
                format!("{:?}", other.geometry_type()),
                "Expected Polygon or MultiPolygon".to_string(),
            );
            result
        }
    }
}

fn validate_polygon(rings: &[Vec<[f64; 2]>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if rings.is_empty() {
        result.add_error("Polygon".to_string(), "Polygon has no exterior ring".to_string());
        return result;
    }

    for (i, ring) in rings.iter().enumerate() {
        let location = if i == 0 {
            "Polygon exterior".to_string()
        } else {
            format!("Polygon interior[{}]", i - 1)
        };
        result.absorb(&location, validate_positions("ring", ring));
    }

    result
}

fn validate_positions(location: &str, ring: &[[f64; 2]]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("Ring must have at least 4 positions, found {}", ring.len()),
        );
    }

    for (i, position) in ring.iter().enumerate() {
        if !position[0].is_finite() || !position[1].is_finite() {
            result.add_error(format!("{}[{}]", location, i), "Coordinates must be finite".to_string());
        }
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        let first = Coordinate::from_lon_lat(*first);
        if !Coordinate::from_lon_lat(*last).approx_eq(&first, DEFAULT_COORDINATE_EPSILON) {
            result.add_error(
                location.to_string(),
                "Ring must be closed (last position within epsilon of the first)".to_string(),
            );
        }
    }

    result
}
