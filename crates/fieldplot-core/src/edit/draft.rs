use serde::{Deserialize, Serialize};

use crate::models::VertexPoint;

/// A saved, resumable polygon
///
/// `points` may store the ring closure explicitly (last point equal to the
/// first) or leave it implicit; [`PolygonEditor::from_draft`] accepts both.
///
/// [`PolygonEditor::from_draft`]: super::PolygonEditor::from_draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonDraft {
    pub points: Vec<VertexPoint>,
    #[serde(default)]
    pub closed: bool,
}

impl PolygonDraft {
    pub fn new(points: Vec<VertexPoint>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
