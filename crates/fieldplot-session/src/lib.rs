//! Fieldplot Session - Turning map input into polygon edits
//!
//! An [`EditSession`] is created by the screen that draws or edits an area
//! and lives as long as that screen. It routes taps, marker taps, drags and
//! the completion action to the polygon editor, and resolves area and
//! location once the shape is closed.

pub mod session;
pub mod summary;
pub mod warning;

pub use session::{EditSession, MarkerAction, TapIgnored, TapOutcome, VertexRemoval};
pub use summary::AreaSummary;
pub use warning::EditWarning;
