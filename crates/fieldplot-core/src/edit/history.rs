//! Snapshot-based undo/redo history

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::VertexPoint;

/// Default number of undo snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 128;

/// A full copy of the editor state at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub points: Vec<VertexPoint>,
    pub closed: bool,
}

/// Linear undo/redo over whole-list snapshots.
///
/// Recording a new snapshot discards everything that could be redone.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    /// Maximum number of undo snapshots kept; the oldest is dropped first.
    limit: usize,
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl SnapshotHistory {
    pub fn new(limit: usize) -> Self {
        Self { limit: limit.max(1), undo: VecDeque::new(), redo: Vec::new() }
    }

    /// Record the state as it was before a mutation.
    pub fn record(&mut self, before: Snapshot) {
        self.redo.clear();
        self.push_undo(before);
    }

    /// Step back, handing over the current state so it can be redone.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}
