use fieldplot_core::config::{ClosedEditPolicy, EditSettings};
use fieldplot_core::models::{AreaLocation, Coordinate, Geometry, VertexPoint};
use fieldplot_core::ports::{BoundaryLookup, RegionResolver};
use fieldplot_core::{EditOutcome, PolygonDraft, PolygonEditor, Rejection};
use fieldplot_geo::{
    calculate_area_in_hectares, find_closest_segment_for_insertion, is_tap_near_existing_marker,
    lookup_area_location, polygon_centroid,
};
use uuid::Uuid;

use crate::summary::AreaSummary;
use crate::warning::EditWarning;

/// What a map tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Appended as a new vertex
    Added,
    /// Spliced into an existing edge
    Inserted { index: usize },
    Ignored(TapIgnored),
    Rejected(Rejection),
}

/// Why a tap was not turned into an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapIgnored {
    /// The shape is closed; taps do not edit it
    ShapeClosed,
    /// The tap belongs to a vertex marker, which handles it itself
    NearMarker,
}

/// What tapping a vertex marker should do
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerAction {
    /// Show the vertex read-only
    ShowDetails { index: usize },
    /// The first marker was tapped and the shape is now closed
    Closed(AreaSummary),
    None,
}

/// Result of deleting a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRemoval {
    Removed,
    /// The shape fell below three vertices and is open again; warn the user
    ShapeReopened,
    Unchanged(Rejection),
}

/// One drawing or editing session for a single area.
///
/// Owns the polygon editor and is handed the boundary and region lookups it
/// needs; nothing is shared implicitly between sessions.
pub struct EditSession<B, R>
where
    B: BoundaryLookup,
    R: RegionResolver,
{
    id: Uuid,
    settings: EditSettings,
    editor: PolygonEditor,
    boundaries: B,
    regions: R,
}

impl<B, R> EditSession<B, R>
where
    B: BoundaryLookup,
    R: RegionResolver,
{
    /// Start drawing a new area
    pub fn new(settings: EditSettings, boundaries: B, regions: R) -> Self {
        let editor = PolygonEditor::with_settings(&settings);
        let session = Self { id: Uuid::new_v4(), settings, editor, boundaries, regions };
        tracing::debug!(session_id = %session.id, "Started edit session");
        session
    }

    /// Continue a saved draft or edit an existing area
    pub fn resume(draft: PolygonDraft, settings: EditSettings, boundaries: B, regions: R) -> Self {
        let editor = PolygonEditor::from_draft(draft, &settings);
        let mut session = Self { id: Uuid::new_v4(), settings, editor, boundaries, regions };
        session.refresh_location();
        tracing::debug!(
            session_id = %session.id,
            points = session.editor.points().len(),
            closed = session.editor.is_complete(),
            "Resumed edit session"
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    pub fn editor(&self) -> &PolygonEditor {
        &self.editor
    }

    pub fn points(&self) -> &[VertexPoint] {
        self.editor.points()
    }

    pub fn is_complete(&self) -> bool {
        self.editor.is_complete()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    pub fn location(&self) -> Option<&AreaLocation> {
        self.editor.location()
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.editor.to_geometry()
    }

    pub fn draft(&self) -> PolygonDraft {
        self.editor.draft()
    }

    /// Area of the current points in hectares, closed or not
    pub fn area_hectares(&self) -> f64 {
        calculate_area_in_hectares(&self.editor.coordinates())
    }

    /// Handle a tap on the map itself
    pub fn tap(&mut self, coordinate: Coordinate) -> TapOutcome {
        self.tap_vertex(VertexPoint::plain(coordinate))
    }

    /// Handle a tap that carries a vertex, possibly with an attachment.
    ///
    /// Closed shapes ignore taps. Taps on a marker are left to the marker.
    /// Taps close to an edge split that edge; anything else appends.
    pub fn tap_vertex(&mut self, vertex: VertexPoint) -> TapOutcome {
        if self.editor.is_complete() {
            return TapOutcome::Ignored(TapIgnored::ShapeClosed);
        }

        let tap = vertex.coordinate();
        let coordinates = self.editor.coordinates();

        if is_tap_near_existing_marker(tap, &coordinates, self.settings.marker_tolerance_m) {
            tracing::debug!(session_id = %self.id, "Tap near marker ignored");
            return TapOutcome::Ignored(TapIgnored::NearMarker);
        }

        if coordinates.len() >= 2 {
            if let Some(hit) =
                find_closest_segment_for_insertion(tap, &coordinates, self.settings.edge_tolerance_m)
            {
                return match self.editor.insert_point(vertex, hit.insertion_index) {
                    EditOutcome::Unchanged(rejection) => TapOutcome::Rejected(rejection),
                    _ => {
                        tracing::debug!(
                            session_id = %self.id,
                            index = hit.insertion_index,
                            distance_m = hit.distance_m,
                            "Tap inserted into edge"
                        );
                        TapOutcome::Inserted { index: hit.insertion_index }
                    }
                };
            }
        }

        match self.editor.add_point(vertex) {
            EditOutcome::Unchanged(rejection) => TapOutcome::Rejected(rejection),
            _ => TapOutcome::Added,
        }
    }

    /// Handle a tap on the marker of vertex `index`.
    ///
    /// Tapping the first marker of an open shape closes it.
    pub fn tap_marker(&mut self, index: usize) -> Result<MarkerAction, EditWarning> {
        if index >= self.editor.points().len() {
            return Ok(MarkerAction::None);
        }

        if self.editor.is_complete() {
            return Ok(MarkerAction::ShowDetails { index });
        }

        if index == 0 && self.editor.vertex_count() >= 2 {
            return self.complete().map(MarkerAction::Closed);
        }

        Ok(MarkerAction::None)
    }

    /// The "complete" action: close the shape and summarise it.
    ///
    /// Needs three distinct vertices. Completing a closed shape returns its
    /// summary again.
    pub fn complete(&mut self) -> Result<AreaSummary, EditWarning> {
        if !self.editor.is_complete() {
            let unique = self.editor.unique_vertex_count();
            if unique < 3 {
                tracing::debug!(session_id = %self.id, unique, "Completion refused");
                return Err(EditWarning::NotEnoughVertices { unique });
            }

            match self.editor.close_polygon() {
                EditOutcome::Unchanged(Rejection::NotEnoughVertices { unique }) => {
                    return Err(EditWarning::NotEnoughVertices { unique });
                }
                _ => self.refresh_location(),
            }
        }

        let summary = self.build_summary();
        tracing::info!(
            session_id = %self.id,
            hectares = summary.hectares,
            province = summary.location.province.as_deref().unwrap_or("unknown"),
            "Area completed"
        );
        Ok(summary)
    }

    /// Summary of the closed shape, or `None` while it is open
    pub fn summary(&self) -> Option<AreaSummary> {
        self.editor.is_complete().then(|| self.build_summary())
    }

    /// Live position update while a marker is dragged
    pub fn drag_marker(&mut self, index: usize, coordinate: Coordinate) -> EditOutcome {
        self.editor.move_point_live(index, coordinate)
    }

    /// End of a drag: commit the position as one undoable step
    pub fn drop_marker(&mut self, index: usize, coordinate: Coordinate) -> EditOutcome {
        let outcome = self.editor.commit_move(index, coordinate);
        if outcome.changed() {
            self.refresh_location();
        }
        outcome
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.editor.cancel_move()
    }

    /// Delete vertex `index`, subject to the closed-shape policy
    pub fn delete_vertex(&mut self, index: usize) -> Result<VertexRemoval, EditWarning> {
        self.ensure_structural_edits_allowed()?;

        match self.editor.delete_point(index) {
            EditOutcome::Applied => {
                self.refresh_location();
                Ok(VertexRemoval::Removed)
            }
            EditOutcome::Reopened => {
                tracing::warn!(session_id = %self.id, index, "Deleting vertex reopened the area");
                Ok(VertexRemoval::ShapeReopened)
            }
            EditOutcome::Unchanged(rejection) => Ok(VertexRemoval::Unchanged(rejection)),
        }
    }

    /// Reopen a closed shape for editing, subject to the closed-shape policy
    pub fn reopen(&mut self) -> Result<EditOutcome, EditWarning> {
        self.ensure_structural_edits_allowed()?;
        Ok(self.editor.reopen())
    }

    pub fn undo(&mut self) -> EditOutcome {
        let outcome = self.editor.undo();
        self.refresh_location();
        outcome
    }

    pub fn redo(&mut self) -> EditOutcome {
        let outcome = self.editor.redo();
        self.refresh_location();
        outcome
    }

    /// Discard everything drawn in this session
    pub fn reset(&mut self) {
        self.editor.reset();
        tracing::debug!(session_id = %self.id, "Edit session reset");
    }

    fn ensure_structural_edits_allowed(&self) -> Result<(), EditWarning> {
        if self.editor.is_complete()
            && self.settings.closed_edit_policy == ClosedEditPolicy::RepositionOnly
        {
            return Err(EditWarning::ShapeLocked);
        }
        Ok(())
    }

    /// Resolve province/region for a closed shape whose location is unknown
    fn refresh_location(&mut self) {
        if !self.editor.is_complete() || self.editor.location().is_some() {
            return;
        }

        let regions: &dyn RegionResolver = &self.regions;
        let location = lookup_area_location(&self.editor.coordinates(), &self.boundaries, Some(regions));
        tracing::debug!(
            session_id = %self.id,
            province = location.province.as_deref().unwrap_or("unknown"),
            "Resolved area location"
        );
        self.editor.set_location(location);
    }

    fn build_summary(&self) -> AreaSummary {
        let coordinates = self.editor.coordinates();
        AreaSummary {
            vertices: self.editor.points().to_vec(),
            hectares: calculate_area_in_hectares(&coordinates),
            centroid: polygon_centroid(&coordinates),
            location: self.editor.location().cloned().unwrap_or_default(),
        }
    }
}
