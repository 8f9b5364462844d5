use thiserror::Error;

/// Policy violations to show to the user.
///
/// Returned by the session instead of changing the polygon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditWarning {
    #[error("At least 3 distinct points are needed to close the area, found {unique}")]
    NotEnoughVertices { unique: usize },

    #[error("The area is closed; its points can only be moved")]
    ShapeLocked,
}
