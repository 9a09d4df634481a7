//! App-internal clipboard for nodes and the edges between them.

use crate::geometry::compute_bounds_from_items;
use crate::graph::{CodeGraph, GraphEdge, GraphNode, new_id};
use crate::selection::Selection;
use kurbo::{Point, Vec2};
use std::collections::BTreeMap;

/// Nodes and edges produced by a paste, with fresh ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Pasted {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Pasted {
    pub fn ids(&self) -> Selection {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }
}

/// Copied graph fragment. Never touches the system clipboard.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Copy selected nodes plus edges whose endpoints were both copied.
    ///
    /// An empty selection leaves the clipboard untouched. Returns the number
    /// of nodes copied.
    pub fn copy(&mut self, selection: &Selection, graph: &CodeGraph) -> usize {
        let nodes: Vec<GraphNode> = selection
            .iter()
            .filter_map(|id| graph.node(id).cloned())
            .collect();
        if nodes.is_empty() {
            return 0;
        }
        self.edges = graph
            .edges
            .values()
            .filter(|e| selection.contains(&e.source) && selection.contains(&e.target))
            .cloned()
            .collect();
        self.nodes = nodes;
        self.nodes.len()
    }

    /// Fresh copies whose bounds' top-left lands on `at`.
    pub fn paste(&self, at: Point) -> Option<Pasted> {
        let bounds = compute_bounds_from_items(self.nodes.iter().map(GraphNode::bounds))?;
        let offset: Vec2 = at - Point::new(bounds.x0, bounds.y0);

        let mut id_map = BTreeMap::new();
        let nodes: Vec<GraphNode> = self
            .nodes
            .iter()
            .map(|node| {
                let mut copy = node.duplicate();
                copy.position = node.position + offset;
                id_map.insert(node.id.clone(), copy.id.clone());
                copy
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .filter_map(|edge| {
                Some(GraphEdge {
                    id: new_id(),
                    source: id_map.get(&edge.source)?.clone(),
                    target: id_map.get(&edge.target)?.clone(),
                    source_handle: edge.source_handle.clone(),
                    target_handle: edge.target_handle.clone(),
                })
            })
            .collect();

        Some(Pasted { nodes, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeKind, create_empty_code_graph, upsert_edge, upsert_node};

    fn graph() -> std::sync::Arc<CodeGraph> {
        let g = create_empty_code_graph();
        let g = upsert_node(&g, GraphNode::new("a", "A", Point::new(10.0, 10.0), NodeKind::Note { text: "x".into() }));
        let g = upsert_node(&g, GraphNode::new("b", "B", Point::new(110.0, 60.0), NodeKind::Note { text: String::new() }));
        let g = upsert_node(&g, GraphNode::new("c", "C", Point::new(500.0, 500.0), NodeKind::Note { text: String::new() }));
        let g = upsert_edge(&g, GraphEdge { id: "ab".into(), source: "a".into(), target: "b".into(), source_handle: Some("out".into()), target_handle: Some("in".into()) });
        upsert_edge(&g, GraphEdge { id: "bc".into(), source: "b".into(), target: "c".into(), source_handle: None, target_handle: None })
    }

    #[test]
    fn test_copy_keeps_internal_edges_only() {
        let g = graph();
        let mut clipboard = Clipboard::new();
        let selection: Selection = ["a".to_string(), "b".to_string()].into();
        assert_eq!(clipboard.copy(&selection, &g), 2);

        let pasted = clipboard.paste(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(pasted.nodes.len(), 2);
        assert_eq!(pasted.edges.len(), 1);
        let edge = &pasted.edges[0];
        assert!(pasted.ids().contains(&edge.source));
        assert!(pasted.ids().contains(&edge.target));
        assert_ne!(edge.id, "ab");
    }

    #[test]
    fn test_paste_preserves_layout_at_cursor() {
        let g = graph();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&["a".to_string(), "b".to_string()].into(), &g);

        let pasted = clipboard.paste(Point::new(1000.0, 2000.0)).unwrap();
        let a = pasted.nodes.iter().find(|n| n.title == "A").unwrap();
        let b = pasted.nodes.iter().find(|n| n.title == "B").unwrap();
        assert_eq!(a.position, Point::new(1000.0, 2000.0));
        assert_eq!(b.position, Point::new(1100.0, 2050.0));
        assert_ne!(a.id, "a");
    }

    #[test]
    fn test_empty_selection_keeps_clipboard() {
        let g = graph();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&["c".to_string()].into(), &g);
        assert_eq!(clipboard.copy(&Selection::new(), &g), 0);
        assert_eq!(clipboard.len(), 1);
        assert!(Clipboard::new().paste(Point::ZERO).is_none());
    }
}
