use crate::config::EditSettings;
use crate::models::{
    unique_vertex_count, AreaLocation, Coordinate, Geometry, VertexPoint,
    DEFAULT_COORDINATE_EPSILON,
};

use super::draft::PolygonDraft;
use super::history::{Snapshot, SnapshotHistory, DEFAULT_HISTORY_LIMIT};
use super::{EditOutcome, Rejection};

/// Minimum number of distinct vertices of a closed polygon.
pub const MIN_CLOSED_VERTICES: usize = 3;

/// State machine for drawing one polygon.
///
/// The polygon is either open (being drawn) or closed. Closing appends a
/// plain copy of the first vertex, so a closed polygon with `n` vertices
/// stores `n + 1` points and [`points`](Self::points) always describes the
/// ring exactly as it should be drawn.
///
/// Every committed mutation records a snapshot of the previous state, so
/// undo and redo work for insertions, moves and deletions alike.
#[derive(Debug, Clone)]
pub struct PolygonEditor {
    points: Vec<VertexPoint>,
    is_complete: bool,
    location: Option<AreaLocation>,
    history: SnapshotHistory,
    epsilon: f64,
    /// State before the first live move of a drag gesture in progress
    drag_origin: Option<Snapshot>,
}

impl Default for PolygonEditor {
    fn default() -> Self {
        Self::new(DEFAULT_COORDINATE_EPSILON, DEFAULT_HISTORY_LIMIT)
    }
}

impl PolygonEditor {
    /// Create an empty editor
    pub fn new(epsilon: f64, history_limit: usize) -> Self {
        Self {
            points: Vec::new(),
            is_complete: false,
            location: None,
            history: SnapshotHistory::new(history_limit),
            epsilon,
            drag_origin: None,
        }
    }

    /// Create an empty editor from validated settings
    pub fn with_settings(settings: &EditSettings) -> Self {
        Self::new(settings.coordinate_epsilon, settings.history_limit)
    }

    /// Resume a saved draft or an existing area.
    ///
    /// Non-finite points and consecutive duplicates are dropped. A draft
    /// marked closed gets an explicit closing vertex; if it has fewer than
    /// three distinct vertices it is loaded open instead.
    pub fn from_draft(draft: PolygonDraft, settings: &EditSettings) -> Self {
        let mut editor = Self::with_settings(settings);

        let total = draft.points.len();
        editor.points =
            draft.points.into_iter().filter(|p| p.coordinate().is_finite()).collect();
        if editor.points.len() != total {
            tracing::warn!(
                dropped = total - editor.points.len(),
                "Draft contained non-finite coordinates"
            );
        }
        editor.drop_consecutive_duplicates();

        if draft.closed {
            let unique = unique_vertex_count(&editor.coordinates(), editor.epsilon);
            if unique >= MIN_CLOSED_VERTICES {
                if editor.ring_is_closed() {
                    editor.settle_closing_vertex();
                } else {
                    editor.points.push(editor.points[0].to_plain());
                }
                editor.is_complete = true;
            } else {
                tracing::warn!(unique, "Draft marked closed has too few vertices, loading it open");
                if editor.points.len() > 1 && editor.ring_is_closed() {
                    editor.points.pop();
                }
            }
        }

        tracing::debug!(
            points = editor.points.len(),
            closed = editor.is_complete,
            "Loaded polygon draft"
        );
        editor
    }

    /// Current state as a saveable draft
    pub fn draft(&self) -> PolygonDraft {
        PolygonDraft::new(self.points.clone(), self.is_complete)
    }

    /// Stored points, including the closing vertex when closed
    pub fn points(&self) -> &[VertexPoint] {
        &self.points
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.points.iter().map(VertexPoint::coordinate).collect()
    }

    /// Number of vertices, not counting the closing vertex
    pub fn vertex_count(&self) -> usize {
        if self.is_complete {
            self.points.len().saturating_sub(1)
        } else {
            self.points.len()
        }
    }

    /// Number of vertices that are distinct under the coordinate epsilon
    pub fn unique_vertex_count(&self) -> usize {
        unique_vertex_count(&self.coordinates(), self.epsilon)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// True while a drag gesture has live moves that are not committed yet
    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    pub fn location(&self) -> Option<&AreaLocation> {
        self.location.as_ref()
    }

    /// Attach the administrative location resolved for the closed shape.
    ///
    /// Ignored while the polygon is open. Any later change to the shape
    /// clears it.
    pub fn set_location(&mut self, location: AreaLocation) {
        if self.is_complete {
            self.location = Some(location);
        } else {
            tracing::debug!("Ignoring location for an open polygon");
        }
    }

    /// The shape for rendering: a LineString while open, a Polygon once closed
    pub fn to_geometry(&self) -> Option<Geometry> {
        let coordinates = self.coordinates();
        match coordinates.len() {
            0 => None,
            1 => Some(Geometry::point(coordinates[0])),
            _ if self.is_complete => Some(Geometry::polygon_from_ring(&coordinates)),
            _ => Some(Geometry::line_string(&coordinates)),
        }
    }

    /// Append a vertex.
    ///
    /// A coordinate that duplicates any stored point is ignored. Adding to a
    /// closed polygon drops its closing vertex and reopens it.
    pub fn add_point(&mut self, point: impl Into<VertexPoint>) -> EditOutcome {
        let point = point.into();
        if self.contains_coordinate(&point.coordinate()) {
            return EditOutcome::Unchanged(Rejection::DuplicateCoordinate);
        }

        let was_complete = self.is_complete;
        self.begin_edit();
        if was_complete {
            self.points.pop();
            self.mark_open();
        }
        self.points.push(point);

        tracing::debug!(points = self.points.len(), "Added vertex");
        if was_complete {
            EditOutcome::Reopened
        } else {
            EditOutcome::Applied
        }
    }

    /// Splice a vertex in at `index`, clamped to `[0, len]`.
    ///
    /// Not allowed on a closed polygon; reopen it first.
    pub fn insert_point(&mut self, point: impl Into<VertexPoint>, index: usize) -> EditOutcome {
        if self.is_complete {
            return EditOutcome::Unchanged(Rejection::PolygonClosed);
        }

        let point = point.into();
        if self.contains_coordinate(&point.coordinate()) {
            return EditOutcome::Unchanged(Rejection::DuplicateCoordinate);
        }

        let index = index.min(self.points.len());
        self.begin_edit();
        self.points.insert(index, point);

        tracing::debug!(index, points = self.points.len(), "Inserted vertex");
        EditOutcome::Applied
    }

    /// Move the vertex at `index` and record the move in history.
    ///
    /// On a closed polygon moving the first vertex also moves the closing
    /// vertex, and the other way round. A move that would put a vertex on
    /// top of any other stored vertex is rejected, as `add_point` does. If a
    /// drag gesture was in progress the whole gesture becomes one undo step.
    pub fn update_point(&mut self, index: usize, coordinate: Coordinate) -> EditOutcome {
        if index >= self.points.len() {
            return EditOutcome::Unchanged(Rejection::IndexOutOfRange);
        }

        if self.duplicates_other_vertex(index, &coordinate) {
            self.cancel_move();
            return EditOutcome::Unchanged(Rejection::DuplicateCoordinate);
        }

        self.begin_edit();
        self.apply_move(index, coordinate);
        self.location = None;

        tracing::debug!(index, "Moved vertex");
        EditOutcome::Applied
    }

    /// Move a vertex for live preview during a drag, without touching history
    pub fn move_point_live(&mut self, index: usize, coordinate: Coordinate) -> EditOutcome {
        if index >= self.points.len() {
            return EditOutcome::Unchanged(Rejection::IndexOutOfRange);
        }

        if self.drag_origin.is_none() {
            self.drag_origin = Some(self.snapshot());
        }
        self.apply_move(index, coordinate);
        EditOutcome::Applied
    }

    /// Finish a drag gesture at `coordinate`
    pub fn commit_move(&mut self, index: usize, coordinate: Coordinate) -> EditOutcome {
        self.update_point(index, coordinate)
    }

    /// Abandon a drag gesture, restoring the positions from before it.
    ///
    /// Returns false if no drag was in progress.
    pub fn cancel_move(&mut self) -> bool {
        match self.drag_origin.take() {
            Some(origin) => {
                self.points = origin.points;
                self.is_complete = origin.closed;
                true
            }
            None => false,
        }
    }

    /// Remove the vertex at `index`.
    ///
    /// Removing from a closed polygon keeps it closed while three distinct
    /// vertices remain. Otherwise the closing vertex is dropped too and the
    /// outcome is [`EditOutcome::Reopened`] so the caller can warn the user.
    pub fn delete_point(&mut self, index: usize) -> EditOutcome {
        if index >= self.points.len() {
            return EditOutcome::Unchanged(Rejection::IndexOutOfRange);
        }

        self.begin_edit();

        if !self.is_complete {
            self.points.remove(index);
            self.drop_consecutive_duplicates();
            tracing::debug!(index, points = self.points.len(), "Deleted vertex");
            return EditOutcome::Applied;
        }

        // The closing vertex stands for the first one.
        let index = if index == self.points.len() - 1 { 0 } else { index };
        self.points.pop();
        self.points.remove(index);
        self.drop_consecutive_duplicates();
        self.location = None;

        let unique = unique_vertex_count(&self.coordinates(), self.epsilon);
        if unique >= MIN_CLOSED_VERTICES {
            if self.ring_is_closed() {
                self.settle_closing_vertex();
            } else {
                self.points.push(self.points[0].to_plain());
            }
            tracing::debug!(index, points = self.points.len(), "Deleted vertex from closed polygon");
            EditOutcome::Applied
        } else {
            if self.points.len() > 1 && self.ring_is_closed() {
                self.points.pop();
            }
            self.mark_open();
            tracing::debug!(index, unique, "Deletion reopened polygon");
            EditOutcome::Reopened
        }
    }

    /// Restore the state before the last committed mutation
    pub fn undo(&mut self) -> EditOutcome {
        self.cancel_move();
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                tracing::debug!(points = self.points.len(), closed = self.is_complete, "Undo");
                EditOutcome::Applied
            }
            None => EditOutcome::Unchanged(Rejection::NothingToUndo),
        }
    }

    /// Re-apply the last undone mutation
    pub fn redo(&mut self) -> EditOutcome {
        self.cancel_move();
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                tracing::debug!(points = self.points.len(), closed = self.is_complete, "Redo");
                EditOutcome::Applied
            }
            None => EditOutcome::Unchanged(Rejection::NothingToRedo),
        }
    }

    /// Close the ring.
    ///
    /// Needs three distinct vertices. Appends a plain copy of the first
    /// vertex unless the last vertex already sits on the first one. This is
    /// the only way a duplicate coordinate enters the list.
    pub fn close_polygon(&mut self) -> EditOutcome {
        if self.is_complete {
            return EditOutcome::Unchanged(Rejection::AlreadyClosed);
        }

        let unique = self.unique_vertex_count();
        if unique < MIN_CLOSED_VERTICES {
            tracing::debug!(unique, "Not enough vertices to close polygon");
            return EditOutcome::Unchanged(Rejection::NotEnoughVertices { unique });
        }

        self.begin_edit();
        if self.ring_is_closed() {
            self.settle_closing_vertex();
        } else {
            self.points.push(self.points[0].to_plain());
        }
        self.is_complete = true;

        tracing::info!(vertices = self.vertex_count(), "Polygon closed");
        EditOutcome::Applied
    }

    /// Drop the closing vertex and make the polygon editable again
    pub fn reopen(&mut self) -> EditOutcome {
        if !self.is_complete {
            return EditOutcome::Unchanged(Rejection::NotClosed);
        }

        self.begin_edit();
        self.points.pop();
        self.mark_open();

        tracing::debug!(points = self.points.len(), "Polygon reopened");
        EditOutcome::Reopened
    }

    /// Clear points, history and the closed flag
    pub fn reset(&mut self) {
        self.points.clear();
        self.history.clear();
        self.drag_origin = None;
        self.mark_open();
        tracing::debug!("Polygon editor reset");
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot { points: self.points.clone(), closed: self.is_complete }
    }

    /// Record the pre-mutation state. A pending drag folds into this step.
    fn begin_edit(&mut self) {
        let before = match self.drag_origin.take() {
            Some(origin) => origin,
            None => self.snapshot(),
        };
        self.history.record(before);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.points = snapshot.points;
        self.is_complete = snapshot.closed && self.ring_is_closed();
        self.location = None;
    }

    fn mark_open(&mut self) {
        self.is_complete = false;
        self.location = None;
    }

    fn apply_move(&mut self, index: usize, coordinate: Coordinate) {
        self.points[index] = self.points[index].moved_to(coordinate);

        if self.is_complete && self.points.len() > 1 {
            let last = self.points.len() - 1;
            if index == 0 {
                self.points[last] = self.points[last].moved_to(coordinate);
            } else if index == last {
                self.points[0] = self.points[0].moved_to(coordinate);
            }
        }
    }

    fn contains_coordinate(&self, coordinate: &Coordinate) -> bool {
        self.points.iter().any(|p| p.coordinate().approx_eq(coordinate, self.epsilon))
    }

    fn ring_is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => {
                first.coordinate().approx_eq(&last.coordinate(), self.epsilon)
            }
            _ => false,
        }
    }

    /// Would moving vertex `index` to `coordinate` land it on another vertex.
    ///
    /// On a closed polygon the first and closing vertices count as one.
    fn duplicates_other_vertex(&self, index: usize, coordinate: &Coordinate) -> bool {
        let last = self.points.len().saturating_sub(1);
        let is_same_vertex = |other: usize| {
            other == index
                || (self.is_complete
                    && ((index == 0 && other == last) || (index == last && other == 0)))
        };

        self.points
            .iter()
            .enumerate()
            .filter(|(other, _)| !is_same_vertex(*other))
            .any(|(_, point)| point.coordinate().approx_eq(coordinate, self.epsilon))
    }

    /// Turn the last point, which already sits on the first, into a plain
    /// closing copy of it.
    ///
    /// An attachment on that point moves to the first vertex if the first
    /// has none. A different attachment already on the first vertex wins.
    fn settle_closing_vertex(&mut self) {
        let last = self.points.len() - 1;
        let first_attachment = self.points[0].attachment().cloned();

        if let Some(attachment) = self.points[last].attachment().cloned() {
            match first_attachment {
                None => {
                    self.points[0] = VertexPoint::tagged(self.points[0].coordinate(), attachment);
                }
                Some(existing) if existing == attachment => {}
                Some(existing) => tracing::warn!(
                    kept = existing.as_str(),
                    dropped = attachment.as_str(),
                    "Closing vertex and first vertex carry different attachments"
                ),
            }
        }

        self.points[last] = self.points[0].to_plain();
    }

    fn drop_consecutive_duplicates(&mut self) {
        let epsilon = self.epsilon;
        self.points.dedup_by(|current, previous| {
            current.coordinate().approx_eq(&previous.coordinate(), epsilon)
        });
    }
}
