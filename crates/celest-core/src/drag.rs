//! Drag manager: which nodes move together and where they end up.

use crate::selection::Selection;
use kurbo::{Point, Vec2};
use std::collections::BTreeMap;

/// Result of starting a drag on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStart {
    /// Selection after the drag started.
    pub selected_ids: Selection,
    /// Nodes that follow the pointer.
    pub dragged_node_ids: Selection,
    /// Position of every dragged node when the drag started.
    pub drag_start_positions: BTreeMap<String, Point>,
}

/// Work out the drag set for a pointer-down on `node_id`.
///
/// If `node_id` is already selected the whole selection is dragged and the
/// selection is kept. Otherwise the selection collapses to `{node_id}` and
/// only that node is dragged. Ids without a known position are skipped.
pub fn start_drag(node_id: &str, current: &Selection, positions: &BTreeMap<String, Point>) -> DragStart {
    let selected_ids = if current.contains(node_id) {
        current.clone()
    } else {
        Selection::from([node_id.to_string()])
    };

    let drag_start_positions: BTreeMap<String, Point> = selected_ids
        .iter()
        .filter_map(|id| positions.get(id).map(|p| (id.clone(), *p)))
        .collect();
    let dragged_node_ids = drag_start_positions.keys().cloned().collect();

    DragStart {
        selected_ids,
        dragged_node_ids,
        drag_start_positions,
    }
}

/// Translate every dragged node's start position by `delta`.
pub fn update_drag_positions(
    dragged_node_ids: &Selection,
    drag_start_positions: &BTreeMap<String, Point>,
    delta: Vec2,
) -> BTreeMap<String, Point> {
    dragged_node_ids
        .iter()
        .filter_map(|id| drag_start_positions.get(id).map(|start| (id.clone(), *start + delta)))
        .collect()
}

/// Ephemeral state of an in-progress node drag.
///
/// `drag_start_positions` is keyed by exactly `dragged_node_ids`.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub dragged_node_ids: Selection,
    pub drag_start_positions: BTreeMap<String, Point>,
    /// Pointer position in canvas space when the drag (re)started.
    pub drag_start_mouse: Point,
    /// Positions from the most recent pointer move.
    pub current_positions: BTreeMap<String, Point>,
    /// Screen distance the pointer travelled, for click detection.
    pub max_travel_px: f64,
    /// Whether the drag was re-targeted onto duplicates.
    pub duplicated: bool,
    /// Node the pointer went down on.
    pub anchor_id: String,
    /// Start positions of the nodes grabbed originally. Survives re-targeting.
    pub original_positions: BTreeMap<String, Point>,
    /// Selection before the press.
    pub prior_selection: Selection,
    /// Whether the undo checkpoint for this drag was emitted.
    pub checkpointed: bool,
}

impl DragState {
    pub fn new(anchor_id: String, start: DragStart, drag_start_mouse: Point) -> Self {
        let current_positions = start.drag_start_positions.clone();
        let original_positions = start.drag_start_positions.clone();
        Self {
            dragged_node_ids: start.dragged_node_ids,
            drag_start_positions: start.drag_start_positions,
            drag_start_mouse,
            current_positions,
            max_travel_px: 0.0,
            duplicated: false,
            anchor_id,
            original_positions,
            prior_selection: Selection::new(),
            checkpointed: false,
        }
    }

    pub fn with_prior_selection(mut self, selection: Selection) -> Self {
        self.prior_selection = selection;
        self
    }

    /// Get the drag delta for a canvas-space pointer position.
    pub fn delta(&self, pointer: Point) -> Vec2 {
        pointer - self.drag_start_mouse
    }

    /// Recompute positions for a pointer position and remember them.
    pub fn update(&mut self, pointer: Point) -> &BTreeMap<String, Point> {
        let delta = self.delta(pointer);
        self.current_positions = update_drag_positions(&self.dragged_node_ids, &self.drag_start_positions, delta);
        &self.current_positions
    }

    /// Re-target the drag onto new nodes.
    ///
    /// `id_map` maps each dragged id to its copy. The copies start at the
    /// positions the originals have right now and tracking restarts from
    /// `pointer`, so nothing jumps.
    pub fn retarget(&mut self, id_map: &BTreeMap<String, String>, pointer: Point) {
        let mut starts = BTreeMap::new();
        for (old_id, new_id) in id_map {
            if let Some(pos) = self.current_positions.get(old_id) {
                starts.insert(new_id.clone(), *pos);
            }
        }
        if let Some(anchor) = id_map.get(&self.anchor_id) {
            self.anchor_id = anchor.clone();
        }
        self.dragged_node_ids = starts.keys().cloned().collect();
        self.current_positions = starts.clone();
        self.drag_start_positions = starts;
        self.drag_start_mouse = pointer;
        self.duplicated = true;
    }
}
