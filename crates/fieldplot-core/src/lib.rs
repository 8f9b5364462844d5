//! Fieldplot Core - Domain models, polygon editing and configuration
//!
//! This crate contains the polygon edit state machine, its snapshot history,
//! the shared domain models and the port definitions used by the geometry
//! and session crates.

pub mod config;
pub mod edit;
pub mod error;
pub mod models;
pub mod ports;

pub use edit::{EditOutcome, PolygonDraft, PolygonEditor, Rejection};
pub use error::{FieldplotError, Result};
