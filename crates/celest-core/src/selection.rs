//! Selection manager: pure functions computing the next selection set.

use crate::geometry::is_node_in_selection_box;
use crate::graph::CodeGraph;
use kurbo::Rect;
use std::collections::{BTreeMap, BTreeSet};

/// A set of selected node and edge ids.
pub type Selection = BTreeSet<String>;

/// Next selection after clicking `id`.
///
/// Without Shift the result is exactly `{id}`. With Shift, `id` is toggled and
/// every other member is kept.
pub fn handle_node_click(id: &str, current: &Selection, shift_key: bool) -> Selection {
    if !shift_key {
        return Selection::from([id.to_string()]);
    }
    let mut next = current.clone();
    if !next.remove(id) {
        next.insert(id.to_string());
    }
    next
}

/// Every id whose bounds partially overlap `selection_box`.
///
/// Always replaces; combining with a prior selection is up to the caller.
pub fn handle_box_selection<'a, I>(ids: I, bounds_by_id: &BTreeMap<String, Rect>, selection_box: Rect) -> Selection
where
    I: IntoIterator<Item = &'a String>,
{
    ids.into_iter()
        .filter(|id| {
            bounds_by_id
                .get(*id)
                .is_some_and(|bounds| is_node_in_selection_box(*bounds, selection_box))
        })
        .cloned()
        .collect()
}

/// Clicking the empty pane clears the selection.
pub fn handle_pane_click() -> Selection {
    Selection::new()
}

/// Drop ids that no longer name a node or edge in `graph`.
///
/// Returns `None` when nothing had to be removed.
pub fn prune_selection(selection: &Selection, graph: &CodeGraph) -> Option<Selection> {
    if selection.iter().all(|id| graph.contains(id)) {
        return None;
    }
    Some(
        selection
            .iter()
            .filter(|id| graph.contains(id))
            .cloned()
            .collect(),
    )
}

/// Canvas bounds of every node in `graph`.
pub fn node_bounds(graph: &CodeGraph) -> BTreeMap<String, Rect> {
    graph
        .nodes
        .iter()
        .map(|(id, node)| (id.clone(), node.bounds()))
        .collect()
}
