//! Undo/redo history of graph snapshots.

use crate::graph::CodeGraph;
use std::sync::Arc;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Snapshot-based undo/redo stack for one project.
///
/// Snapshots are shared `Arc`s, so recording one costs a pointer copy.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Arc<CodeGraph>>,
    redo_stack: Vec<Arc<CodeGraph>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` before it is changed.
    pub fn push(&mut self, current: &Arc<CodeGraph>) {
        if self.undo_stack.last().is_some_and(|top| Arc::ptr_eq(top, current)) {
            // Checkpoint without an edit in between; redo stays valid.
            return;
        }
        self.undo_stack.push(Arc::clone(current));
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Step back. Returns the graph to restore, or `None` if there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &Arc<CodeGraph>) -> Option<Arc<CodeGraph>> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Arc::clone(current));
        Some(snapshot)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: &Arc<CodeGraph>) -> Option<Arc<CodeGraph>> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(Arc::clone(current));
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
