//! Error types for Fieldplot

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldplotError {
    // Boundary dataset errors
    #[error("Boundary dataset {path} could not be loaded: {reason}")]
    BoundaryDataset { path: PathBuf, reason: String },

    #[error("Invalid geometry at feature {feature_id}: {reason}")]
    InvalidGeometry {
        feature_id: String,
        reason: String,
    },

    // Region table errors
    #[error("Region table could not be parsed: {reason}")]
    RegionTable { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, FieldplotError>;
