//! Polygon editing
//!
//! [`PolygonEditor`] owns the boundary points of one area being drawn, its
//! snapshot history and the open/closed flag. Closure is stored explicitly:
//! a closed polygon ends with a plain copy of its first vertex.

pub mod draft;
pub mod history;
pub mod polygon;

pub use draft::PolygonDraft;
pub use history::{Snapshot, SnapshotHistory};
pub use polygon::PolygonEditor;

/// Result of an editing operation
///
/// Editing never fails hard: an operation either changes the polygon or
/// leaves it untouched and says why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The polygon changed
    Applied,
    /// The polygon changed and is no longer closed
    Reopened,
    /// Nothing changed
    Unchanged(Rejection),
}

impl EditOutcome {
    /// True if the point list or the closed flag changed
    pub fn changed(&self) -> bool {
        !matches!(self, EditOutcome::Unchanged(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            EditOutcome::Unchanged(rejection) => Some(*rejection),
            _ => None,
        }
    }
}

/// Why an operation left the polygon unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The coordinate is already present (within epsilon)
    DuplicateCoordinate,
    IndexOutOfRange,
    /// Structural insertion is not allowed on a closed polygon
    PolygonClosed,
    AlreadyClosed,
    NotClosed,
    /// Closing needs at least three distinct vertices
    NotEnoughVertices { unique: usize },
    NothingToUndo,
    NothingToRedo,
}
